use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum PortRepr {
    Number(u16),
    Text(String),
}

/// Accepts a port written either as a JSON number or as a string (`"9002"`).
pub fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    match PortRepr::deserialize(deserializer)? {
        PortRepr::Number(port) => Ok(port),
        PortRepr::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid port `{}`", s))),
    }
}
