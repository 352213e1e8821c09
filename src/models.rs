use std::fmt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Identifier assigned by the remote API. Kept opaque: the backend hands out
/// UUIDs, older deployments plain integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty id would address the collection itself.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::new(id)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WireId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match WireId::deserialize(deserializer)? {
            WireId::Text(id) => RecordId(id),
            WireId::Signed(id) => RecordId(id.to_string()),
            WireId::Unsigned(id) => RecordId(id.to_string()),
        })
    }
}

/// A grade as listed by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub id: RecordId,
    #[serde(rename = "Clase")]
    pub class: String,
    #[serde(rename = "Alumno")]
    pub student: String,
    #[serde(rename = "Nota", default)]
    pub grade: RemoteGrade,
    #[serde(rename = "Fecha", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl fmt::Display for GradeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - Nota: {}", self.class, self.student, self.grade)
    }
}

/// `Nota` exactly as the server sent it. Usually an integer, but a record
/// stored with a NaN grade comes back as `null`, and lenient deployments may
/// hand out floats or strings. Shown as-is rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteGrade(Value);

impl RemoteGrade {
    pub fn as_i64(&self) -> Option<i64> {
        self.0.as_i64()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<i64> for RemoteGrade {
    fn from(value: i64) -> Self {
        RemoteGrade(Value::from(value))
    }
}

impl fmt::Display for RemoteGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            // Strings print without their JSON quotes.
            Value::String(text) => f.write_str(text),
            other => write!(f, "{}", other),
        }
    }
}

/// A grade typed by the user. Unparseable input is kept as `NotANumber` and
/// still sent; the remote API is the one that rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeValue {
    Integer(i64),
    NotANumber,
}

impl GradeValue {
    /// Integer-prefix parse: leading whitespace and an optional sign, then the
    /// longest run of digits (`0x` switches to hex). Anything after is ignored.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (radix, digits) = match rest.get(..2) {
            Some("0x") | Some("0X") => (16, &rest[2..]),
            _ => (10, rest),
        };

        let end = digits
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(digits.len());
        if end == 0 {
            return GradeValue::NotANumber;
        }

        match i64::from_str_radix(&digits[..end], radix) {
            Ok(value) if negative => GradeValue::Integer(-value),
            Ok(value) => GradeValue::Integer(value),
            Err(_) => GradeValue::NotANumber,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            GradeValue::Integer(value) => Some(*value),
            GradeValue::NotANumber => None,
        }
    }
}

impl fmt::Display for GradeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeValue::Integer(value) => write!(f, "{}", value),
            GradeValue::NotANumber => f.write_str("NaN"),
        }
    }
}

// NaN has no JSON form; it goes over the wire as `null`.
impl Serialize for GradeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GradeValue::Integer(value) => serializer.serialize_i64(*value),
            GradeValue::NotANumber => serializer.serialize_none(),
        }
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGrade {
    #[serde(rename = "Clase")]
    pub class: String,
    #[serde(rename = "Alumno")]
    pub student: String,
    #[serde(rename = "Nota")]
    pub grade: GradeValue,
}

/// Body of an update request; only the fields that are set get sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeUpdate {
    #[serde(rename = "Clase", skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(rename = "Alumno", skip_serializing_if = "Option::is_none")]
    pub student: Option<String>,
    #[serde(rename = "Nota", skip_serializing_if = "Option::is_none")]
    pub grade: Option<GradeValue>,
}

impl GradeUpdate {
    pub fn is_empty(&self) -> bool {
        self.class.is_none() && self.student.is_none() && self.grade.is_none()
    }
}

/// Raw text of the create form, owned by whoever hosts the synchronizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradeForm {
    pub class: String,
    pub student: String,
    pub grade: String,
}

impl GradeForm {
    pub fn new(class: impl Into<String>, student: impl Into<String>, grade: impl Into<String>) -> Self {
        GradeForm {
            class: class.into(),
            student: student.into(),
            grade: grade.into(),
        }
    }

    pub fn to_new_grade(&self) -> NewGrade {
        NewGrade {
            class: self.class.clone(),
            student: self.student.clone(),
            grade: GradeValue::parse(&self.grade),
        }
    }

    pub fn clear(&mut self) {
        self.class.clear();
        self.student.clear();
        self.grade.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.class.is_empty() && self.student.is_empty() && self.grade.is_empty()
    }
}
