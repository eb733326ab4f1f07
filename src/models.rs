//! Record models
//!
//! Typed values for the advertising data set the generator produces. Each
//! model is a [`Record`], so its kind tag is fixed by the type.

use serde::{Deserialize, Serialize};

use crate::envelope::Record;
use crate::error::Result;
use crate::table::Table;

macro_rules! record_kind {
    ($($model:ty => $kind:literal),* $(,)?) => {
        $(
            impl Record for $model {
                const KIND: &'static str = $kind;
            }
        )*
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor_id: Option<u64>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: u64,
    pub name: String,
    pub start_date: String,
    pub finish_date: String,
    pub client_id: u64,
    pub manager_id: u64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdPlatform {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPlatform {
    pub campaign_id: u64,
    pub platform_id: u64,
    pub budget_cents: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSet {
    pub id: u64,
    pub name: String,
    pub campaign_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_country: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub id: u64,
    pub name: String,
    pub file_path: String,
    pub creation_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub media_asset_id: u64,
    pub duration: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub media_asset_id: u64,
    pub resolution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdText {
    pub id: u64,
    pub text: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: u64,
    pub ad_set_id: u64,
    pub media_asset_id: u64,
    pub ad_text_id: u64,
    pub created_at: String,
}

record_kind! {
    Client => "client",
    Employee => "employee",
    Campaign => "campaign",
    AdPlatform => "ad_platform",
    CampaignPlatform => "campaign_platform",
    AdSet => "ad_set",
    MediaAsset => "media_asset",
    Video => "video",
    Image => "image",
    AdText => "ad_text",
    Ad => "ad",
}

/// Any one model value; serializes as the bare model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModelRecord {
    Client(Client),
    Employee(Employee),
    Campaign(Campaign),
    AdPlatform(AdPlatform),
    CampaignPlatform(CampaignPlatform),
    AdSet(AdSet),
    MediaAsset(MediaAsset),
    Video(Video),
    Image(Image),
    AdText(AdText),
    Ad(Ad),
}

impl ModelRecord {
    /// Kind tag of the wrapped model
    pub fn kind(&self) -> &'static str {
        match self {
            ModelRecord::Client(_) => Client::KIND,
            ModelRecord::Employee(_) => Employee::KIND,
            ModelRecord::Campaign(_) => Campaign::KIND,
            ModelRecord::AdPlatform(_) => AdPlatform::KIND,
            ModelRecord::CampaignPlatform(_) => CampaignPlatform::KIND,
            ModelRecord::AdSet(_) => AdSet::KIND,
            ModelRecord::MediaAsset(_) => MediaAsset::KIND,
            ModelRecord::Video(_) => Video::KIND,
            ModelRecord::Image(_) => Image::KIND,
            ModelRecord::AdText(_) => AdText::KIND,
            ModelRecord::Ad(_) => Ad::KIND,
        }
    }

    /// Insert under `key`, tagged with the model's kind
    pub fn insert_into(&self, table: &Table, key: &str) -> Result<()> {
        match self {
            ModelRecord::Client(r) => table.insert_record(key, r),
            ModelRecord::Employee(r) => table.insert_record(key, r),
            ModelRecord::Campaign(r) => table.insert_record(key, r),
            ModelRecord::AdPlatform(r) => table.insert_record(key, r),
            ModelRecord::CampaignPlatform(r) => table.insert_record(key, r),
            ModelRecord::AdSet(r) => table.insert_record(key, r),
            ModelRecord::MediaAsset(r) => table.insert_record(key, r),
            ModelRecord::Video(r) => table.insert_record(key, r),
            ModelRecord::Image(r) => table.insert_record(key, r),
            ModelRecord::AdText(r) => table.insert_record(key, r),
            ModelRecord::Ad(r) => table.insert_record(key, r),
        }
    }
}
