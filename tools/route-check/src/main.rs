use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use geo::Point;
use geojson::GeoJson;
use saferoute_core::{DashboardEvent, DashboardState, EvalContext, RenderSnapshot, SessionConfig};
use saferoute_proximity::DEFAULT_BUFFER_M;
use std::path::PathBuf;

mod input;

use input::{read_reviews, read_route};

#[derive(Parser, Debug)]
#[command(
    name = "route-check",
    author,
    version,
    about = "Check which safety reviews lie along a route",
    long_about = "Loads reviews from a JSON array and a route from a GeoJSON LineString, \
                  reports every review within the buffer distance of the route and the \
                  dashboard statistics for them.\n\n\
                  Optionally writes the rendered map layers (markers, highlights, heatmap \
                  and route) as a GeoJSON FeatureCollection."
)]
struct Args {
    /// Reviews JSON file (array of review objects)
    #[arg(short, long)]
    reviews: PathBuf,

    /// Route GeoJSON file (LineString geometry, Feature or FeatureCollection)
    #[arg(long)]
    route: PathBuf,

    /// Buffer distance around the route in meters
    #[arg(short, long, default_value_t = DEFAULT_BUFFER_M)]
    buffer: f64,

    /// Write the rendered map layers to this GeoJSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    if args.buffer.is_nan() || args.buffer < 0.0 {
        bail!("Buffer must be a non-negative distance, got {}", args.buffer);
    }

    let reviews = read_reviews(&args.reviews)?;
    let route = read_route(&args.route)?;
    log::info!("Loaded {} reviews from {}", reviews.len(), args.reviews.display());
    log::info!("Route has {} points", route.len());

    if !route.is_routable() {
        log::warn!("Route has fewer than two points, no review can be on it");
    }

    let config = SessionConfig {
        buffer_m: args.buffer,
        ..Default::default()
    };
    let now = Utc::now();
    let ctx = EvalContext::from_config(&config, now);

    let state = DashboardState::new()
        .apply(DashboardEvent::ReviewsLoaded(reviews), &ctx)
        .apply(DashboardEvent::RouteFound(route.clone()), &ctx);

    let stats = state.stats().formatted();
    println!("Mode:                   {}", state.mode());
    println!("Reviews along route:    {}", or_dash(&stats.count));
    println!("Average safety:         {}", or_dash(&stats.average_safety));
    println!("Average infrastructure: {}", or_dash(&stats.average_infrastructure));
    println!("Reported this week:     {}", or_dash(&stats.recent_count));

    for review in state.on_route_reviews() {
        let position = Point::new(review.lng, review.lat);
        let distance = route.min_distance_m(position).unwrap_or(f64::INFINITY);
        println!(
            "  {:>8.1} m  safety {} infra {}  {}  {}",
            distance,
            review.safety_rating,
            review.infrastructure_rating,
            review.location(),
            review.description
        );
    }

    if let Some(output) = &args.output {
        let snapshot = RenderSnapshot::build(&state, now);
        let geojson = GeoJson::FeatureCollection(snapshot.to_geojson());
        std::fs::write(output, geojson.to_string())
            .with_context(|| format!("Failed to write GeoJSON to: {}", output.display()))?;
        log::info!("Wrote map layers to {}", output.display());
    }

    Ok(())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
