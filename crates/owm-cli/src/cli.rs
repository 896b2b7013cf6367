use clap::{Parser, Subcommand};
use owm_query::QueryParam;

#[derive(Debug, Parser)]
#[command(name = "owm", version, about = "OpenWeatherMap query client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List query families and their templates
    Catalog {
        /// Only show this family (name or legacy id 0/1/2)
        #[arg(long)]
        family: Option<String>,
    },

    /// Print the resolved query path without sending it
    Build {
        /// Query family (current_weather, five_day_forecast, uv_index or 0/1/2)
        family: String,
        /// Query name within the family, e.g. by_city_name
        name: String,
        /// Parameter values in placeholder order
        #[arg(allow_hyphen_values = true)]
        params: Vec<String>,
    },

    /// Build a query, send it and print the JSON answer
    Query {
        family: String,
        name: String,
        #[arg(allow_hyphen_values = true)]
        params: Vec<String>,
    },

    /// Look up a city and show its current weather, forecast or UV index
    Weather {
        /// City name (case-insensitive prefix)
        city: String,
        /// Two-letter country code
        #[arg(long)]
        country: Option<String>,
        /// Show the 5-day forecast instead
        #[arg(long, conflicts_with = "uv")]
        forecast: bool,
        /// Show the UV index instead
        #[arg(long)]
        uv: bool,
    },

    /// City reference data
    Cities {
        #[command(subcommand)]
        command: CitiesCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum CitiesCommand {
    /// Find cities by name prefix
    Search {
        name: String,
        #[arg(long)]
        country: Option<String>,
        /// Maximum number of rows to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// List every country code in the city list
    Countries,
}

/// Interpret a command-line value.
///
/// Values that print back unchanged as an integer or float keep their numeric
/// form; anything else (including zero-padded ZIP codes) is text, URL-encoded
/// because the builder substitutes values verbatim.
pub fn parse_param(raw: &str) -> QueryParam {
    if let Some(n) = raw.parse::<i64>().ok().filter(|n| n.to_string() == raw) {
        return QueryParam::Int(n);
    }
    if let Some(x) = raw.parse::<f64>().ok().filter(|x| x.is_finite() && format!("{:?}", x) == raw) {
        return QueryParam::Float(x);
    }
    QueryParam::Text(urlencoding::encode(raw).into_owned())
}
