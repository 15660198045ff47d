use trip_links::geo::{
    ParseOutcome, coordinate_to_google_maps_url, coordinate_to_naver_map_url, parse_map_url,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        eprintln!("Usage: trip-links <map-url>...");
        eprintln!();
        eprintln!("Extracts coordinates from Google, Naver, Kakao and Apple map links.");
        std::process::exit(2);
    }

    let mut failures = 0;
    for url in &urls {
        match parse_map_url(url) {
            ParseOutcome::Success(loc) => {
                let formatted = loc.coordinate.format();
                println!("{url}");
                println!("  source:    {}", loc.source);
                println!("  latitude:  {}", formatted.lat);
                println!("  longitude: {}", formatted.lng);
                println!("  google:    {}", coordinate_to_google_maps_url(&loc.coordinate));
                println!("  naver:     {}", coordinate_to_naver_map_url(&loc.coordinate));
            }
            ParseOutcome::Failure(reason) => {
                failures += 1;
                println!("{url}");
                println!("  coordinate extraction failed: {reason}");
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}
