//! DSBMobile wire DTOs.
//!
//! These types map directly onto the JSON exchanged with the `GetData`
//! endpoint. The backend is undocumented and loosely typed, so the menu
//! tree is read node by node from raw JSON rather than through a strict
//! derive.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Result code the backend sends on success.
pub const RESULT_CODE_OK: i64 = 0;

/// The device metadata and credentials the backend expects.
///
/// Field names are PascalCase on the wire (`UserId`, `BundleId`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestPayload {
    pub user_id: String,
    pub user_pw: String,
    pub app_version: String,
    pub language: String,
    pub os_version: String,
    pub app_id: String,
    pub device: String,
    pub bundle_id: String,
    pub date: String,
    pub last_update: String,
}

/// Outer POST body: `{"req": {"Data": ..., "DataType": 1}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBody {
    pub req: RequestData,
}

/// Encoded payload plus its data type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestData {
    /// base64(gzip(compact JSON of [`RequestPayload`]))
    pub data: String,
    pub data_type: u8,
}

/// Outer response body; `d` holds base64(gzip(JSON envelope)).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResponseBody {
    pub d: String,
}

/// Decoded response envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "Resultcode")]
    pub result_code: i64,

    #[serde(rename = "ResultStatusInfo", default)]
    pub result_status_info: String,

    #[serde(
        rename = "ResultMenuItems",
        default,
        deserialize_with = "deserialize_menu_items"
    )]
    pub result_menu_items: Vec<MenuItem>,
}

/// Error for a menu tree element that is not a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("menu item must be a JSON object")]
pub struct InvalidMenuItem;

/// One node of the backend's menu tree.
///
/// Built from raw JSON one node at a time. `Childs` may be a list, a single
/// object or anything else; elements that are not objects are dropped
/// without affecting their siblings, and a `Detail` that is not a string
/// counts as absent. Other fields such as `Title` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "serde_json::Value")]
pub struct MenuItem {
    /// Document URL on terminal nodes.
    #[serde(rename = "Detail", skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(rename = "Childs")]
    pub children: Vec<MenuItem>,

    /// Pages wrap their content in a `Root` node.
    #[serde(rename = "Root", skip_serializing_if = "Option::is_none")]
    pub root: Option<Box<MenuItem>>,
}

impl TryFrom<Value> for MenuItem {
    type Error = InvalidMenuItem;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = value else {
            return Err(InvalidMenuItem);
        };

        let detail = match fields.remove("Detail") {
            Some(Value::String(detail)) => Some(detail),
            _ => None,
        };
        let children = fields.remove("Childs").map(menu_items).unwrap_or_default();
        let root = fields
            .remove("Root")
            .and_then(|root| MenuItem::try_from(root).ok())
            .map(Box::new);

        Ok(MenuItem {
            detail,
            children,
            root,
        })
    }
}

/// Menu items from a `Childs`-style value: a list, one object, or neither.
pub fn menu_items(value: Value) -> Vec<MenuItem> {
    match value {
        Value::Array(elements) => elements
            .into_iter()
            .filter_map(|element| MenuItem::try_from(element).ok())
            .collect(),
        object @ Value::Object(_) => MenuItem::try_from(object).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn deserialize_menu_items<'de, D>(deserializer: D) -> Result<Vec<MenuItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(menu_items)
}
