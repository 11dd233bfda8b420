use eyre::Result;
use reqwest::Method;
use serde::Deserialize;

use crate::api::HttpApi;
use crate::models::{Setting, SettingUpdate, SettingsMap};

#[derive(Default, Debug, Deserialize)]
struct SettingsResponse {
    #[serde(default)]
    settings: SettingsMap,
}

/// Key/value configuration store of the backend. Values are passed through
/// untouched.
impl HttpApi {
    pub async fn get_settings(&self) -> Result<SettingsMap> {
        let req = self.request(Method::GET, self.url("/settings"));
        let res: SettingsResponse = self.fetch(req, "listing settings").await?;
        Ok(res.settings)
    }

    pub async fn get_setting(&self, key: &str) -> Result<Setting> {
        let req = self.request(Method::GET, self.url(&format!("/settings/{}", key)));
        self.fetch(req, "getting setting").await
    }

    pub async fn update_setting(&self, update: &SettingUpdate) -> Result<Setting> {
        let req = self
            .request(Method::POST, self.url("/settings"))
            .json(update);
        self.fetch(req, "updating setting").await
    }

    pub async fn delete_setting(&self, key: &str) -> Result<()> {
        let req = self.request(Method::DELETE, self.url(&format!("/settings/{}", key)));
        self.execute(req, "deleting setting").await
    }
}
