use crate::{
    config::{PlannerConfig, DEFAULT_MODEL},
    schemas::validate_itinerary,
    services::{catalog::DEFAULT_CATALOG_LIMIT, load_catalog, ImageCache, TripRequest},
    types::{decode_structured_str, NormalizedItinerary, PlaceCatalogEntry},
    ItineraryPipeline, ItineraryPlanner, ItineraryRenderer, JsonRenderer, RenderRequest,
    TextRenderer,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, io::Read, time::Duration};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// CLI entry point for the itinerary tool
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();

    let result = match matches.subcommand() {
        Some(("normalize", sub)) => normalize(sub),
        Some(("plan", sub)) => plan(sub).await,
        Some(("validate", sub)) => validate(sub),
        _ => Err("a subcommand is required".into()),
    };

    if let Err(e) = &result {
        error!("Command failed: {}", e);
    }
    result
}

fn command() -> Command {
    let days = Arg::new("days")
        .short('d')
        .long("days")
        .value_name("N")
        .help("Number of days the itinerary must contain")
        .value_parser(clap::value_parser!(usize))
        .required(true);
    let format = Arg::new("format")
        .short('f')
        .long("format")
        .value_name("FORMAT")
        .help("Output format")
        .value_parser(["text", "json"])
        .default_value("text");
    let catalog = Arg::new("catalog")
        .short('c')
        .long("catalog")
        .value_name("FILE")
        .help("JSON array of catalog places");

    Command::new("itinerary")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Normalize LLM travel plans into fixed-shape day records")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("normalize")
                .about("Normalize saved model output")
                .arg(
                    Arg::new("input")
                        .help("File with raw model output, or - for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(days.clone())
                .arg(catalog.clone())
                .arg(
                    Arg::new("destination")
                        .long("destination")
                        .value_name("LABEL")
                        .help("Destination shown in the header")
                        .default_value("Your trip"),
                )
                .arg(format.clone()),
        )
        .subcommand(
            Command::new("plan")
                .about("Ask the model for an itinerary and normalize it")
                .arg(
                    Arg::new("state")
                        .long("state")
                        .value_name("STATE")
                        .action(ArgAction::Append)
                        .required(true),
                )
                .arg(
                    Arg::new("region")
                        .long("region")
                        .value_name("REGION")
                        .action(ArgAction::Append)
                        .required(true),
                )
                .arg(days)
                .arg(catalog.required(true))
                .arg(Arg::new("season").long("season").default_value("summer"))
                .arg(Arg::new("trip-type").long("trip-type").default_value("solo"))
                .arg(
                    Arg::new("theme")
                        .long("theme")
                        .value_name("THEME")
                        .action(ArgAction::Append),
                )
                .arg(Arg::new("budget").long("budget").default_value("mid"))
                .arg(
                    Arg::new("target-places")
                        .long("target-places")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5"),
                )
                .arg(
                    Arg::new("image-dir")
                        .long("image-dir")
                        .value_name("DIR")
                        .help("Download catalog images here before planning"),
                )
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .value_name("MODEL")
                        .help(format!(
                            "The OpenRouter model to use (or set ITINERARY_MODEL) [default: {DEFAULT_MODEL}]"
                        )),
                )
                .arg(
                    Arg::new("api-key")
                        .short('k')
                        .long("api-key")
                        .value_name("KEY")
                        .help("OpenRouter API key (or set OPENAI_API_KEY env var)"),
                )
                .arg(
                    Arg::new("base-url")
                        .short('u')
                        .long("base-url")
                        .value_name("URL")
                        .help("OpenRouter base URL (or set OPENAI_BASE_URL / OPENROUTER_BASE_URL env vars)"),
                )
                .arg(
                    Arg::new("timeout")
                        .short('t')
                        .long("timeout")
                        .value_name("SECONDS")
                        .help("Request timeout in seconds (or set ITINERARY_TIMEOUT_SECS) [default: 120]")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(format),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a saved normalized itinerary")
                .arg(
                    Arg::new("file")
                        .help("Normalized itinerary JSON")
                        .required(true)
                        .index(1),
                ),
        )
}

fn normalize(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let input = matches.get_one::<String>("input").ok_or("input is required")?;
    let days = *matches.get_one::<usize>("days").ok_or("--days is required")?;
    let catalog = read_catalog(matches.get_one::<String>("catalog"))?;

    let raw_text = read_input(input)?;
    let itinerary = ItineraryPipeline::default().run(&raw_text, days, &catalog)?;

    let destination = matches
        .get_one::<String>("destination")
        .map(String::as_str)
        .unwrap_or("Your trip");
    print_itinerary(matches, destination, days, itinerary)
}

async fn plan(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let api_key = matches
        .get_one::<String>("api-key")
        .cloned()
        .or_else(|| env::var("OPENAI_API_KEY").ok())
        .ok_or("OpenRouter API key is required. Set OPENAI_API_KEY environment variable or use --api-key")?;

    // Environment first, then flags on top
    let config = apply_flag_overrides(matches, PlannerConfig::new(api_key).with_env_overrides()?);

    let request = trip_request(matches)?;
    let mut catalog = read_catalog(matches.get_one::<String>("catalog"))?;
    if let Some(dir) = matches.get_one::<String>("image-dir") {
        ImageCache::new(dir).ensure_local_images(&mut catalog).await?;
    }

    info!("Using model: {}", config.model);
    info!("Base URL: {}", config.base_url);

    let itinerary = ItineraryPlanner::new(config)
        .plan(&request, &catalog)
        .await?;
    print_itinerary(matches, &request.destination_label(), request.days, itinerary)
}

fn validate(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let file = matches.get_one::<String>("file").ok_or("file is required")?;
    let raw = read_input(file)?;

    let itinerary: NormalizedItinerary = decode_structured_str(&raw)?;
    validate_itinerary(&itinerary)?;

    println!("{file}: ok ({} days)", itinerary.days.len());
    Ok(())
}

fn apply_flag_overrides(matches: &ArgMatches, mut config: PlannerConfig) -> PlannerConfig {
    if let Some(model) = matches.get_one::<String>("model") {
        config.model = model.clone();
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config.base_url = base_url.clone();
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.timeout = Duration::from_secs(*timeout);
    }
    config
}

fn trip_request(matches: &ArgMatches) -> Result<TripRequest, Box<dyn std::error::Error>> {
    let values = |id: &str| -> Vec<String> {
        matches
            .get_many::<String>(id)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    };
    let text = |id: &str| matches.get_one::<String>(id).cloned().unwrap_or_default();

    let days = *matches.get_one::<usize>("days").ok_or("--days is required")?;
    let mut request = TripRequest::new(values("state"), values("region"), days);
    request.season = text("season");
    request.trip_type = text("trip-type");
    request.budget = text("budget");
    request.target_places = *matches.get_one::<usize>("target-places").unwrap_or(&5);

    let themes = values("theme");
    if !themes.is_empty() {
        request.themes = themes;
    }
    Ok(request)
}

fn read_catalog(path: Option<&String>) -> crate::Result<Vec<PlaceCatalogEntry>> {
    match path {
        Some(path) => load_catalog(path, DEFAULT_CATALOG_LIMIT),
        None => Ok(Vec::new()),
    }
}

fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
    }
}

fn print_itinerary(
    matches: &ArgMatches,
    destination: &str,
    days: usize,
    itinerary: NormalizedItinerary,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = RenderRequest::new(destination, days, itinerary);
    let rendered = match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => JsonRenderer.render(&request)?,
        _ => TextRenderer.render(&request)?,
    };
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn test_plan_arguments_build_trip_request() {
        let matches = command().get_matches_from([
            "itinerary", "plan", "--state", "Utah", "--state", "Arizona", "--region", "Moab",
            "--days", "4", "--catalog", "places.json", "--theme", "Hiking", "--budget", "low",
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        let request = trip_request(sub).unwrap();

        assert_eq!(request.states, vec!["Utah", "Arizona"]);
        assert_eq!(request.days, 4);
        assert_eq!(request.themes, vec!["Hiking"]);
        assert_eq!(request.budget, "low");
        assert_eq!(request.season, "summer");
        assert_eq!(request.target_places, 5);
    }

    #[test]
    fn test_flags_override_environment_settings() {
        let from_env = PlannerConfig::new("key")
            .with_model("env/model")
            .with_base_url("http://env.example/v1")
            .with_timeout(Duration::from_secs(30));

        let plan_args = [
            "itinerary", "plan", "--state", "Utah", "--region", "Moab", "--days", "2",
            "--catalog", "places.json",
        ];
        let matches = command().get_matches_from(plan_args);
        let (_, sub) = matches.subcommand().unwrap();
        let config = apply_flag_overrides(sub, from_env.clone());
        assert_eq!(config.model, "env/model");
        assert_eq!(config.base_url, "http://env.example/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));

        let matches = command().get_matches_from(
            plan_args
                .into_iter()
                .chain(["--model", "flag/model", "--timeout", "5"]),
        );
        let (_, sub) = matches.subcommand().unwrap();
        let config = apply_flag_overrides(sub, from_env);
        assert_eq!(config.model, "flag/model");
        assert_eq!(config.base_url, "http://env.example/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_normalize_requires_days() {
        let result = command().try_get_matches_from(["itinerary", "normalize", "out.txt"]);
        assert!(result.is_err());
    }
}
