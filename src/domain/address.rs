// src/domain/address.rs
//
// Address - value object produced by a Fetcher
//
// Decoding accepts the field names of every supported source
// (English names and the ViaCEP Portuguese ones), in any letter case.
// Missing or null fields decode as empty strings; unknown keys are
// skipped.

use std::fmt;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::cep::Cep;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Address {
    pub cep: String,
    pub city: String,
    pub neighborhood: String,
    pub state: String,
    pub street: String,
}

impl Address {
    /// True when no field carries data.
    pub fn is_empty(&self) -> bool {
        self.cep.is_empty()
            && self.city.is_empty()
            && self.neighborhood.is_empty()
            && self.state.is_empty()
            && self.street.is_empty()
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(AddressVisitor)
    }
}

struct AddressVisitor;

impl<'de> Visitor<'de> for AddressVisitor {
    type Value = Address;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an address object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Address, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut address = Address::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.to_ascii_lowercase().as_str() {
                "cep" => {
                    address.cep = map
                        .next_value::<Option<Cep>>()?
                        .map(Cep::into_string)
                        .unwrap_or_default();
                }
                "city" | "localidade" => address.city = text(&mut map)?,
                "neighborhood" | "bairro" => address.neighborhood = text(&mut map)?,
                "state" | "uf" => address.state = text(&mut map)?,
                "street" | "logradouro" => address.street = text(&mut map)?,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(address)
    }
}

fn text<'de, A>(map: &mut A) -> Result<String, A::Error>
where
    A: MapAccess<'de>,
{
    Ok(map.next_value::<Option<String>>()?.unwrap_or_default())
}
