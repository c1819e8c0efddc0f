use reqwest::Url;
use serde::{
    de::{DeserializeOwned, Error},
    Deserialize, Deserializer,
};
use tracing::error;

pub fn deserialize_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::custom("url present but empty"));
    }
    Url::parse(s).map_err(Error::custom)
}

pub fn parse_app_config<T, I>(vars: I) -> Result<T, envy::Error>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = (String, String)>,
{
    envy::from_iter(vars)
}

/// Reads the config from the process environment, after loading `.env` if there is one.
pub fn get_app_config<T: DeserializeOwned>() -> T {
    dotenvy::dotenv().ok();

    match parse_app_config(std::env::vars()) {
        Ok(config) => config,
        Err(err) => {
            error!("failed to parse config: {}", err);
            std::process::exit(1);
        }
    }
}
