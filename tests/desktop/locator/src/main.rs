//! Desktop test binary for venuekit-locator.
//!
//! Run with: cargo run -p venuekit-locator-demo -- [--force] [--city <name>]

use venuekit_geocode::{NominatimConfig, NominatimGeocoder};
use venuekit_location::SystemGeolocation;
use venuekit_locator::{Detection, LocationService, LocationSnapshot};
use venuekit_storage::FileStore;

fn print_snapshot(snapshot: &LocationSnapshot) {
    match &snapshot.location {
        Some(location) if location.has_fix() => {
            println!("  Latitude:  {:.6}°", location.latitude);
            println!("  Longitude: {:.6}°", location.longitude);
        }
        Some(_) => println!("  Coordinates: (no fix yet)"),
        None => println!("  Location: (none)"),
    }
    println!("  City:      {}", snapshot.display_city().unwrap_or("-"));
    if let Some(state) = snapshot.location.as_ref().and_then(|l| l.state.as_deref()) {
        println!("  State:     {state}");
    }
    if let Some(error) = &snapshot.error_msg {
        println!("  Error:     {error}");
    }
}

#[tokio::main]
async fn main() {
    println!("=== Venuekit Locator Test ===\n");

    let mut force = false;
    let mut city = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--force" => force = true,
            "--city" => city = args.next(),
            other => println!("Ignoring unknown argument: {other}"),
        }
    }

    let store = match FileStore::for_app("venuekit") {
        Ok(store) => store,
        Err(e) => {
            println!("✗ No storage available: {e}");
            return;
        }
    };
    println!("Cache file: {}\n", store.path().display());

    let geocoder = match NominatimGeocoder::new(NominatimConfig::default()) {
        Ok(geocoder) => geocoder,
        Err(e) => {
            println!("✗ Failed to build geocoder: {e}");
            return;
        }
    };

    let service = LocationService::new(store, SystemGeolocation::new(), geocoder);

    if let Some(city) = city {
        println!("Setting city manually to {city}...");
        service.set_city_manually(city).await;
        print_snapshot(&service.snapshot());
        return;
    }

    println!("Restoring cached location...");
    service.restore_cache().await;
    print_snapshot(&service.snapshot());

    println!("\nDetecting location{}...", if force { " (forced)" } else { "" });
    match service.detect(force).await {
        Detection::Updated(_) => println!("✓ Location updated"),
        Detection::Failed(e) => println!("✗ Detection failed: {e}"),
        Detection::AlreadyRunning => println!("… Detection already running"),
    }
    print_snapshot(&service.snapshot());
}
