use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClassificationRequest {
    pub image: String,
}

/// Body of a 2xx reply from the classification endpoint.
///
/// Every field is optional at the JSON level; whether the reply is usable
/// is decided when it is rendered.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ClassificationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_probabilities: Option<ClassProbabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-class probabilities in the order the server wrote them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassProbabilities(pub Vec<(String, f64)>);

impl ClassProbabilities {
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, prob)| (name.as_str(), *prob))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ClassProbabilities {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        ClassProbabilities(iter.into_iter().map(|(name, prob)| (name.into(), prob)).collect())
    }
}

impl Serialize for ClassProbabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, prob) in &self.0 {
            map.serialize_entry(name, prob)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ClassProbabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ClassProbabilities;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of class names to probabilities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                // A null probability reads as zero rather than rejecting the reply.
                while let Some((name, prob)) = access.next_entry::<String, Option<f64>>()? {
                    entries.push((name, prob.unwrap_or(0.0)));
                }
                Ok(ClassProbabilities(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}
