mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use owm_client::WeatherClient;
use owm_core::{AppError, Config};
use owm_query::{Catalog, QueryBuilder, QueryFamily};

use cli::{Cli, Command};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = owm_core::init() {
        eprintln!("{}", e);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        match e.downcast_ref::<AppError>() {
            Some(app) => eprintln!("{}", app.user_message()),
            None => eprintln!("{:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let (config, _) = Config::load_validated()?;

    let custom = config.query.load_catalog()?;
    let catalog = match &custom {
        Some(catalog) => catalog,
        None => Catalog::standard().map_err(AppError::from)?,
    };
    let builder = QueryBuilder::new(catalog).with_excess_policy(config.query.excess_parameters);

    match cli.command {
        Command::Catalog { family } => commands::catalog(catalog, family.as_deref()),
        Command::Build {
            family,
            name,
            params,
        } => commands::build(&builder, &family, &name, &params),
        Command::Query {
            family,
            name,
            params,
        } => {
            let client = WeatherClient::new(&config.api, builder).map_err(AppError::from)?;
            commands::query(&client, &family, &name, &params).await
        }
        Command::Weather {
            city,
            country,
            forecast,
            uv,
        } => {
            let family = if forecast {
                QueryFamily::FiveDayForecast
            } else if uv {
                QueryFamily::UvIndex
            } else {
                QueryFamily::CurrentWeather
            };
            let client = WeatherClient::new(&config.api, builder).map_err(AppError::from)?;
            commands::weather(&config, &client, &city, country.as_deref(), family).await
        }
        Command::Cities { command } => commands::cities(&config, command).await,
    }
}
