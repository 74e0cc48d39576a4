//! Wikidata entity claims as a fallback source for missing fields.
//!
//! The entity-data JSON looks like
//! `{"entities": {"Q123": {"claims": {"P57": [{"mainsnak": {"datavalue": {...}}}]}}}}`.
//! Only the JSON syntax is checked up front. Everything below `entities` is
//! read leniently: an entity, property or claim that does not have the
//! expected shape yields no value for that field and leaves the others alone.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, WikiMoviesError};
use crate::record::{Field, MovieRecord};

/// Base URL for per-entity JSON dumps
pub const ENTITY_DATA_BASE: &str = "https://www.wikidata.org/wiki/Special:EntityData";

/// Publication date property
pub const PUBLICATION_DATE: &str = "P577";

/// Property codes and the field each one fills
pub const PROPERTY_FIELDS: [(&str, Field); 4] = [
    ("P136", Field::Genre),
    ("P57", Field::Director),
    ("P495", Field::Country),
    (PUBLICATION_DATE, Field::Year),
];

/// Top-level entity-data document
#[derive(Debug, Clone, Default)]
pub struct EntityDocument {
    entities: Map<String, Value>,
}

impl EntityDocument {
    /// Parse a payload; fails only on invalid JSON
    pub fn parse(payload: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(payload)?;
        let entities = value
            .get("entities")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Ok(Self { entities })
    }

    pub fn entity(&self, qid: &str) -> Option<EntityClaims> {
        self.entities.get(qid).map(EntityClaims::from_value)
    }
}

/// One entity: property code -> raw claim list
#[derive(Debug, Clone, Default)]
pub struct EntityClaims {
    claims: Map<String, Value>,
}

impl EntityClaims {
    /// Read the `claims` object of an entity. Anything else, including the
    /// `[]` sent for entities without statements, counts as no claims.
    pub fn from_value(entity: &Value) -> Self {
        let claims = entity
            .get("claims")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Self { claims }
    }

    /// Claim list for a property; empty when absent or not a list
    pub fn property(&self, code: &str) -> &[Value] {
        self.claims
            .get(code)
            .and_then(Value::as_array)
            .map(|claims| claims.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Deserialize)]
struct Claim {
    mainsnak: Snak,
}

#[derive(Debug, Deserialize)]
struct Snak {
    datavalue: Option<DataValue>,
}

#[derive(Debug, Deserialize)]
struct DataValue {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: Value,
}

/// Typed payload of a claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimValue {
    Text(String),
    /// Referenced entity id, e.g. "Q130232"
    EntityId(String),
    /// Encoded time like "+2010-05-01T00:00:00Z"
    Time(String),
}

impl ClaimValue {
    /// Decode the first claim's `mainsnak.datavalue`, if it has a known type
    pub fn from_claim(raw: &Value) -> Option<ClaimValue> {
        let claim: Claim = serde_json::from_value(raw.clone()).ok()?;
        let datavalue = claim.mainsnak.datavalue?;
        match datavalue.kind.as_str() {
            "string" => datavalue.value.as_str().map(|s| ClaimValue::Text(s.to_string())),
            "wikibase-entityid" => datavalue
                .value
                .get("id")
                .and_then(|v| v.as_str())
                .map(|s| ClaimValue::EntityId(s.to_string())),
            "time" => datavalue
                .value
                .get("time")
                .and_then(|v| v.as_str())
                .map(|s| ClaimValue::Time(s.to_string())),
            _ => None,
        }
    }

    /// Field text for this value; times become their 4-digit year
    pub fn to_field_value(&self) -> String {
        match self {
            ClaimValue::Text(s) | ClaimValue::EntityId(s) => s.clone(),
            ClaimValue::Time(t) => time_year(t),
        }
    }
}

/// Year part of an encoded time, skipping the leading sign
fn time_year(time: &str) -> String {
    let unsigned = time.strip_prefix(['+', '-']).unwrap_or(time);
    let year: String = unsigned.chars().take(4).collect();
    if year.chars().count() == 4 {
        year
    } else {
        String::new()
    }
}

/// First usable value of a claim list, or ""
pub fn first_value(claims: &[Value]) -> String {
    claims
        .first()
        .and_then(ClaimValue::from_claim)
        .map(|v| v.to_field_value())
        .unwrap_or_default()
}

/// Fill empty record fields from an entity's claims. Never overwrites.
///
/// The year always comes from the leading four digits of the publication
/// date, whether the claim is a time value or a plain date string.
pub fn resolve_claims(entity: &EntityClaims, item: &mut MovieRecord) {
    for (property, field) in PROPERTY_FIELDS {
        if !item.is_missing(field) {
            continue;
        }
        let mut value = first_value(entity.property(property));
        if field == Field::Year {
            value = time_year(&value);
        }
        if !value.is_empty() {
            debug!(property, field = field.name(), %value, "filled from entity claims");
            item.set(field, value);
        }
    }
}

/// URL of the entity-data JSON for a QID
pub fn entity_data_url(qid: &str) -> String {
    format!("{}/{}.json", ENTITY_DATA_BASE, qid)
}

/// Decode an entity-data payload and resolve the entity matching `qid`.
///
/// Returns an error only when the payload is not JSON; a payload without the
/// entity leaves the record untouched.
pub fn resolve_payload(payload: &str, qid: &str, item: &mut MovieRecord) -> Result<()> {
    let document = EntityDocument::parse(payload)
        .map_err(|e| WikiMoviesError::ClaimsPayload(format!("{}: {}", qid, e)))?;

    match document.entity(qid) {
        Some(entity) => resolve_claims(&entity, item),
        None => debug!(qid, "entity missing from payload"),
    }
    Ok(())
}
