use secrecy::{ExposeSecret, SecretString};
use url::Url;

/// Path of the testing page a trained model links to
pub const TESTING_PATH: &str = "/testing_audio_on_fish";

/// Model id and credential handed over by a link into the testing workflow
#[derive(Debug, Clone, Default)]
pub struct EntryContext {
    pub model_id: Option<String>,
    pub token: Option<SecretString>,
}

impl EntryContext {
    /// Parse a raw query string, with or without the leading `?`
    ///
    /// `modelId` wins over `id`. Empty values count as absent.
    pub fn from_query(query: &str) -> Self {
        let mut model_id = None;
        let mut id = None;
        let mut token = None;

        for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            let slot = match key.as_ref() {
                "modelId" => &mut model_id,
                "id" => &mut id,
                "token" => &mut token,
                _ => continue,
            };
            slot.get_or_insert_with(|| value.to_string());
        }

        Self {
            model_id: model_id.or(id),
            token: token.map(SecretString::from),
        }
    }

    /// Parse the query part of a full link
    pub fn from_link(link: &Url) -> Self {
        Self::from_query(link.query().unwrap_or_default())
    }

    /// Both values are present, so the model can be looked up right away
    pub const fn should_lookup(&self) -> bool {
        self.model_id.is_some() && self.token.is_some()
    }
}

/// Link into the testing workflow for a freshly trained model
pub fn testing_link(app_url: &Url, model_id: &str, token: &SecretString) -> Url {
    let mut url = app_url.clone();
    url.set_path(TESTING_PATH);
    url.query_pairs_mut()
        .clear()
        .append_pair("modelId", model_id)
        .append_pair("token", token.expose_secret());
    url
}
