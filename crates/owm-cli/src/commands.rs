use anyhow::{Context, Result};
use owm_cities::{CityListProvider, CityLookup, CityRecord};
use owm_client::WeatherClient;
use owm_core::{AppError, Config};
use owm_query::{Catalog, QueryBuilder, QueryFamily, QueryParam};

use crate::cli::{parse_param, CitiesCommand};

pub fn catalog(catalog: &Catalog, family: Option<&str>) -> Result<()> {
    let partitions = match family {
        Some(key) => vec![catalog.lookup_key(key).map_err(AppError::from)?],
        None => catalog.partitions().collect(),
    };

    for partition in partitions {
        println!("{} ({})", partition.family(), partition.family().id());
        for template in partition.templates() {
            let suffixes: Vec<&str> = template.optional_suffixes().collect();
            if suffixes.is_empty() {
                println!("  {:<24} {}", template.name(), template.required_pattern());
            } else {
                println!(
                    "  {:<24} {} [{}]",
                    template.name(),
                    template.required_pattern(),
                    suffixes.join(" ")
                );
            }
        }
    }
    Ok(())
}

pub fn build(builder: &QueryBuilder<'_>, family: &str, name: &str, raw: &[String]) -> Result<()> {
    let params: Vec<QueryParam> = raw.iter().map(|p| parse_param(p)).collect();
    let path = builder
        .build_by_key(family, name, &params)
        .map_err(AppError::from)?;
    println!("{}", path);
    Ok(())
}

pub async fn query(client: &WeatherClient<'_>, family: &str, name: &str, raw: &[String]) -> Result<()> {
    let params: Vec<QueryParam> = raw.iter().map(|p| parse_param(p)).collect();
    let body = client
        .query_by_key(family, name, &params)
        .await
        .map_err(AppError::from)?;
    print_json(&body)
}

pub async fn cities(config: &Config, command: CitiesCommand) -> Result<()> {
    let lookup = open_lookup(config).await?;

    match command {
        CitiesCommand::Search {
            name,
            country,
            limit,
        } => {
            let found = lookup.search(&name, country.as_deref());
            for city in found.iter().take(limit) {
                println!("{}", city);
            }
            if found.len() > limit {
                println!("... {} more", found.len() - limit);
            }
            tracing::info!("{} cities match '{}'", found.len(), name);
        }
        CitiesCommand::Countries => {
            println!("{}", lookup.country_list().join(" "));
        }
    }
    Ok(())
}

/// Resolve a city by name, then query by its id (current weather and
/// forecast) or its coordinates (UV index).
pub async fn weather(
    config: &Config,
    client: &WeatherClient<'_>,
    city: &str,
    country: Option<&str>,
    family: QueryFamily,
) -> Result<()> {
    let lookup = open_lookup(config).await?;
    let found = lookup.search(city, country);
    let selected: &CityRecord = found
        .first()
        .copied()
        .with_context(|| format!("No city matches '{}'", city))?;

    if found.len() > 1 {
        tracing::info!("{} cities match, using {}", found.len(), selected);
    }

    let body = match family {
        QueryFamily::CurrentWeather => client.current_by_city_id(selected.id).await,
        QueryFamily::FiveDayForecast => client.forecast_by_city_id(selected.id).await,
        QueryFamily::UvIndex => {
            client
                .uv_for_location(selected.latitude(), selected.longitude())
                .await
        }
    }
    .map_err(AppError::from)?;

    print_json(&body)
}

async fn open_lookup(config: &Config) -> Result<CityLookup> {
    let provider = CityListProvider::new(&config.cities).map_err(AppError::from)?;
    let lookup = CityLookup::initialize(&provider).await;
    if let Some(e) = lookup.last_error() {
        eprintln!("{}", e.user_message());
    } else {
        tracing::info!("{}", lookup.index());
    }
    Ok(lookup)
}

fn print_json(body: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(body).context("Failed to format response")?;
    println!("{}", text);
    Ok(())
}
