use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

const ISO_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// One wishlist page in the database.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub properties: Properties,
}

/// Page properties as the rest of the app sees them. The app ID stays text here:
/// it is whatever the database holds, and may not be numeric.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "WireProperties", into = "WireProperties")]
pub struct Properties {
    pub app_id: String,
    pub name: String,
    pub current_price: Option<u64>,
    pub lowest_price: Option<u64>,
    pub release_date: Option<Date>,
}

#[derive(Serialize, Deserialize)]
struct WireProperties {
    #[serde(rename = "App ID")]
    app_id: TitleProperty,
    #[serde(rename = "Name")]
    name: RichTextProperty,
    #[serde(rename = "Current Price")]
    current_price: NumberProperty,
    #[serde(rename = "Lowest Price")]
    lowest_price: NumberProperty,
    #[serde(rename = "Release Date")]
    release_date: DateProperty,
}

#[derive(Serialize, Deserialize)]
struct TitleProperty {
    title: Vec<TextRun>,
}

#[derive(Serialize, Deserialize)]
struct RichTextProperty {
    rich_text: Vec<TextRun>,
}

#[derive(Serialize, Deserialize)]
struct TextRun {
    text: Text,
}

#[derive(Serialize, Deserialize)]
struct Text {
    content: String,
}

#[derive(Serialize, Deserialize)]
struct NumberProperty {
    number: Option<u64>,
}

#[derive(Serialize, Deserialize)]
struct DateProperty {
    date: Option<DateValue>,
}

#[derive(Serialize, Deserialize)]
struct DateValue {
    #[serde(serialize_with = "serialize_date", deserialize_with = "deserialize_date")]
    start: Date,
}

fn serialize_date<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    let formatted = date.format(ISO_DATE).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

fn deserialize_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
    let start = String::deserialize(deserializer)?;
    // Dates edited by hand in Notion may carry a time part.
    let day = start.get(..10).unwrap_or(&start);
    Date::parse(day, ISO_DATE).map_err(serde::de::Error::custom)
}

fn runs(content: String) -> Vec<TextRun> {
    vec![TextRun {
        text: Text { content },
    }]
}

fn plain_text(runs: Vec<TextRun>) -> String {
    runs.into_iter().map(|run| run.text.content).collect()
}

impl From<WireProperties> for Properties {
    fn from(wire: WireProperties) -> Self {
        Self {
            app_id: plain_text(wire.app_id.title),
            name: plain_text(wire.name.rich_text),
            current_price: wire.current_price.number,
            lowest_price: wire.lowest_price.number,
            release_date: wire.release_date.date.map(|date| date.start),
        }
    }
}

impl From<Properties> for WireProperties {
    fn from(properties: Properties) -> Self {
        Self {
            app_id: TitleProperty {
                title: runs(properties.app_id),
            },
            name: RichTextProperty {
                rich_text: runs(properties.name),
            },
            current_price: NumberProperty {
                number: properties.current_price,
            },
            lowest_price: NumberProperty {
                number: properties.lowest_price,
            },
            release_date: DateProperty {
                date: properties.release_date.map(|start| DateValue { start }),
            },
        }
    }
}
