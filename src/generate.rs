//! Synthetic record generator
//!
//! Produces typed model records, either as `insert <key> <json>` lines for
//! loading a table through the shell or inserted directly with their kind tag.
//! The random source is owned by the generator and supplied by the caller, so
//! a seeded RNG reproduces the same keys and dates.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;
use serde_json::Value;

use crate::error::Result;
use crate::models::{
    Ad, AdPlatform, AdSet, AdText, Campaign, CampaignPlatform, Client, Employee, Image,
    MediaAsset, ModelRecord, Video,
};
use crate::table::Table;

/// Record models the generator knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Client,
    Employee,
    Campaign,
    AdPlatform,
    CampaignPlatform,
    AdSet,
    MediaAsset,
    Video,
    Image,
    AdText,
    Ad,
}

impl Model {
    pub const ALL: [Model; 11] = [
        Model::Client,
        Model::Employee,
        Model::Campaign,
        Model::AdPlatform,
        Model::CampaignPlatform,
        Model::AdSet,
        Model::MediaAsset,
        Model::Video,
        Model::Image,
        Model::AdText,
        Model::Ad,
    ];

    /// Look up a model by name (case-insensitive); unknown names give `Client`
    pub fn from_name(name: &str) -> Model {
        let name = name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|model| model.name() == name)
            .unwrap_or(Model::Client)
    }

    /// Name used in keys, e.g. `ad_set` in `ad_set:42`
    pub fn name(self) -> &'static str {
        match self {
            Model::Client => "client",
            Model::Employee => "employee",
            Model::Campaign => "campaign",
            Model::AdPlatform => "ad_platform",
            Model::CampaignPlatform => "campaign_platform",
            Model::AdSet => "ad_set",
            Model::MediaAsset => "media_asset",
            Model::Video => "video",
            Model::Image => "image",
            Model::AdText => "ad_text",
            Model::Ad => "ad",
        }
    }
}

/// How generated keys are formed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStyle {
    /// `<model>:<id>`
    Model,

    /// Random integer in `[1, max]`; collisions between lines are expected
    Int { max: u64 },
}

/// Generates model records from an explicit random source
pub struct Generator<R: Rng> {
    rng: R,
    key_style: KeyStyle,
    now: DateTime<Utc>,
}

impl<R: Rng> Generator<R> {
    pub fn new(rng: R, key_style: KeyStyle) -> Self {
        Self {
            rng,
            key_style,
            now: Utc::now(),
        }
    }

    /// Fix the timestamp used for `createdAt` and campaign dates
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Key and typed record for `id` of `model`
    pub fn model_record(&mut self, model: Model, id: u64) -> (String, ModelRecord) {
        let key = self.key(model, id);
        let ts = rfc3339(self.now);

        let record = match model {
            Model::Client => ModelRecord::Client(Client {
                id,
                name: format!("Client {}", id),
                email: format!("client{:03}@example.com", id),
                created_at: ts,
            }),
            Model::Employee => ModelRecord::Employee(Employee {
                id,
                name: format!("Employee {}", id),
                position: pick(&["Engineer", "Manager", "Designer"], id).to_string(),
                manager_id: (id > 1).then(|| 1 + id % 3),
                mentor_id: None,
                created_at: ts,
            }),
            Model::Campaign => {
                let start = self.now + Duration::days(self.rng.gen_range(0..10));
                let finish = start + Duration::days(7 + self.rng.gen_range(0..14));
                ModelRecord::Campaign(Campaign {
                    id,
                    name: format!("Campaign {}", id),
                    start_date: rfc3339(start),
                    finish_date: rfc3339(finish),
                    client_id: 1 + id % 5,
                    manager_id: 1 + id % 3,
                    created_at: ts,
                })
            }
            Model::AdPlatform => ModelRecord::AdPlatform(AdPlatform {
                id,
                name: pick(&["Meta", "Google", "TikTok", "X"], id).to_string(),
            }),
            Model::CampaignPlatform => ModelRecord::CampaignPlatform(CampaignPlatform {
                campaign_id: 1 + id % 7,
                platform_id: 1 + id % 4,
                budget_cents: 10000 + id % 5000,
            }),
            Model::AdSet => ModelRecord::AdSet(AdSet {
                id,
                name: format!("AdSet {}", id),
                campaign_id: 1 + id % 7,
                target_age: Some("18-35".to_string()),
                target_gender: Some("any".to_string()),
                target_country: Some("US".to_string()),
                created_at: ts,
            }),
            Model::MediaAsset => ModelRecord::MediaAsset(MediaAsset {
                id,
                name: format!("asset_{}", id),
                file_path: format!("/assets/{}.bin", id),
                creation_date: ts,
            }),
            Model::Video => ModelRecord::Video(Video {
                media_asset_id: id,
                duration: 30 + id % 60,
            }),
            Model::Image => ModelRecord::Image(Image {
                media_asset_id: id,
                resolution: "1080x1080".to_string(),
            }),
            Model::AdText => ModelRecord::AdText(AdText {
                id,
                text: format!("Buy now {}!", id),
                created_at: ts,
            }),
            Model::Ad => ModelRecord::Ad(Ad {
                id,
                ad_set_id: 1 + id % 7,
                media_asset_id: 1 + id % 11,
                ad_text_id: 1 + id % 13,
                created_at: ts,
            }),
        };

        (key, record)
    }

    /// Key and JSON value for record `id` of `model`
    pub fn record(&mut self, model: Model, id: u64) -> Result<(String, Value)> {
        let (key, record) = self.model_record(model, id);
        Ok((key, serde_json::to_value(&record)?))
    }

    /// One shell line: `insert <key> <json>`
    pub fn line(&mut self, model: Model, id: u64) -> Result<String> {
        let (key, record) = self.model_record(model, id);
        Ok(format!("insert {} {}", key, serde_json::to_string(&record)?))
    }

    /// Insert record `id` of `model` straight into `table`, tagged with the
    /// model's kind. Returns the key used.
    pub fn load(&mut self, table: &Table, model: Model, id: u64) -> Result<String> {
        let (key, record) = self.model_record(model, id);
        record.insert_into(table, &key)?;
        Ok(key)
    }

    fn key(&mut self, model: Model, id: u64) -> String {
        match self.key_style {
            KeyStyle::Model => format!("{}:{}", model.name(), id),
            KeyStyle::Int { max } => self.rng.gen_range(1..=max.max(1)).to_string(),
        }
    }
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn pick<'a>(options: &[&'a str], id: u64) -> &'a str {
    options[(id % options.len() as u64) as usize]
}
