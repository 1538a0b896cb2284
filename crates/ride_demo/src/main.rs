//! End-to-end demo: phone login, quote, driver selection, and a simulated
//! ride against an in-process [RideService].

mod drivers;

use std::thread;
use std::time::Duration;

use clap::Parser;
use ride_core::ecs::RideState;
use ride_core::geo::Place;
use ride_core::matching::{MatchConstraints, SortKey};
use ride_core::service::{RideService, ServiceConfig};

#[derive(Debug, Parser)]
#[command(name = "ride_demo", about = "Run one booking through the ride engine")]
struct Args {
    /// Vehicle class: AUTO, CAR, BIKE, SCOOTY, or EV.
    #[arg(long, default_value = "CAR")]
    mode: String,

    /// Rider phone in +<country><number> form.
    #[arg(long, default_value = "+919876543210")]
    phone: String,

    /// Max driver distance in km.
    #[arg(long, default_value_t = 3.0)]
    max_distance_km: f64,

    /// Minimum driver rating.
    #[arg(long, default_value_t = 4.5)]
    min_rating: f64,

    /// Emit responses as JSON instead of prose.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let service = RideService::new(ServiceConfig::default(), drivers::demo_pool());
    tracing::info!(mode = %args.mode, "demo booking flow starting");

    let issued = service.request_otp(&args.phone)?;
    let code = issued
        .dev_code
        .ok_or("demo expects the dev-echo OTP delivery")?;
    let session = service.verify_otp(&args.phone, &code)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!("logged in as {} ({:?})", session.subject, session.role);
    }

    let pickup = Place::at("HITEC City, Hyderabad", 17.4435, 78.3772);
    let destination = Place::at("Madhapur, Hyderabad", 17.4494, 78.3916);
    let quote = service.quote(&args.mode, &pickup, &destination)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        println!(
            "{} -> {}: {:.1} km, fare {}, eta {} min",
            pickup.label,
            destination.label,
            quote.quote.distance_km,
            quote.quote.fare,
            quote.quote.eta_minutes
        );
    }

    let constraints = MatchConstraints {
        max_distance_km: args.max_distance_km,
        min_rating: args.min_rating,
        min_vehicle_condition: 4.0,
        sort_key: SortKey::Rating,
    };
    let candidates = service.match_drivers(&args.mode, &constraints)?;
    let Some(driver) = candidates.first().cloned() else {
        println!("no drivers match the current constraints");
        return Ok(());
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
    } else {
        for candidate in &candidates {
            println!(
                "  {} ({}) rating {:.1}, {:.1} km away, {}",
                candidate.name, candidate.id, candidate.rating, candidate.distance_km,
                candidate.badge
            );
        }
        println!("picking {}", driver.name);
    }

    let ride = service.confirm_ride(&session.token, quote.quote, driver)?;
    // Matching and assignment settle within a couple of milliseconds.
    thread::sleep(Duration::from_millis(5));
    service.start_ride(&session.token, ride)?;

    loop {
        thread::sleep(Duration::from_millis(600));
        let snapshot = service.get_progress(&session.token, ride)?;
        if args.json {
            println!("{}", serde_json::to_string(&snapshot)?);
        } else {
            println!(
                "{:?}: {:>3.0}%",
                snapshot.state,
                snapshot.progress * 100.0
            );
        }
        if snapshot.state == RideState::Completed {
            break;
        }
    }

    if !args.json {
        let telemetry = service.telemetry();
        println!(
            "done: {} confirmed, {} completed",
            telemetry.rides_confirmed, telemetry.rides_completed
        );
    }
    Ok(())
}
