// REST helper module: a small blocking HTTP client for the media server's
// `/rest/v2` API. Each method issues exactly one request and hands the
// decoded JSON back to the calling test; nothing is retried or cached.

use crate::config::{effective_base_url, RestConfig};
use crate::error::{RestError, Result};
use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// Path prefix of the management REST API.
pub const REST_PATH: &str = "/rest/v2";

const BROADCAST_LIST_PATH: &str = "/request?_path=Conference/rest/v2/broadcasts/list/0/50";
const VOD_LIST_PATH: &str = "/request?_path=Conference/rest/v2/vods/list/0/5";
const CLUSTER_NODES_PATH: &str = "/cluster/nodes/0/10";

/// REST client bound to one server. The underlying reqwest client keeps a
/// cookie store, so the session cookie obtained by `login` is replayed on
/// every later call made through the same helper.
#[derive(Clone)]
pub struct RestHelper {
    client: Client,
    base_url: String,
    rest_url: String,
    user: String,
    password: String,
}

#[derive(Serialize, Debug)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Only the viewer count is read from a broadcast entry. The count must be
/// an integer; a fractional value such as `2.0` fails decoding.
#[derive(Deserialize, Debug)]
struct BroadcastEntry {
    #[serde(rename = "webRTCViewerCount")]
    web_rtc_viewer_count: i64,
}

/// Totals reported by `RestHelper::get_broadcasts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastSummary {
    /// Number of broadcasts in the listing.
    pub publishers: usize,
    /// Sum of `webRTCViewerCount` over those broadcasts.
    pub players: i64,
}

impl RestHelper {
    /// Build a helper for `url`. A `localhost:3000` URL is redirected to
    /// `http://localhost:5080`, see [`effective_base_url`].
    pub fn new(url: &str, user: &str, password: &str) -> Result<Self> {
        let base_url = effective_base_url(url);
        info!(url = %base_url, "rest url");
        let client = Client::builder().cookie_store(true).build()?;
        Ok(RestHelper {
            client,
            rest_url: format!("{}{}", base_url, REST_PATH),
            base_url,
            user: user.to_string(),
            password: password.to_string(),
        })
    }

    /// Build a helper from a loaded [`RestConfig`].
    pub fn from_config(config: &RestConfig) -> Result<Self> {
        Self::new(&config.url, &config.user, &config.password)
    }

    /// Server URL after the dev-server override.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` followed by `/rest/v2`.
    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    /// Login email sent by `login`.
    pub fn user(&self) -> &str {
        &self.user
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.rest_url, path)
    }

    /// Authenticate the session. The response is only logged: a rejected
    /// login is not reported here and shows up on the next call instead.
    pub fn login(&self) -> Result<()> {
        let url = self.url("/users/authenticate");
        debug!(%url, "POST");
        let res = self
            .client
            .post(&url)
            .json(&LoginRequest {
                email: &self.user,
                password: &self.password,
            })
            .send()?;
        info!(status = %res.status(), user = %self.user, "login response");
        Ok(())
    }

    /// Fetch the first 50 broadcasts and total their WebRTC viewers.
    ///
    /// The totals are logged at `info` and only reach the console once a
    /// subscriber is installed (see [`crate::logging::init_logging`]); the
    /// returned summary carries them either way.
    pub fn get_broadcasts(&self) -> Result<BroadcastSummary> {
        let res = self.get(BROADCAST_LIST_PATH)?;
        let items: Vec<BroadcastEntry> = read_json(res)?;
        let summary = BroadcastSummary {
            publishers: items.len(),
            players: items.iter().map(|b| b.web_rtc_viewer_count).sum(),
        };
        info!(publishers = summary.publishers, "total publishers");
        info!(players = summary.players, "total players");
        Ok(summary)
    }

    /// Look up the VoD recorded for `stream_id`.
    ///
    /// Only the first page of 5 entries is searched; an older recording of
    /// the same stream is reported as `None`.
    pub fn get_vod_for(&self, stream_id: &str) -> Result<Option<Value>> {
        let res = self.get(VOD_LIST_PATH)?;
        let items: Vec<Value> = read_json(res)?;
        for item in items {
            let id = item
                .get("streamId")
                .ok_or(RestError::MissingField("streamId"))?;
            if id.as_str() == Some(stream_id) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    /// Read the settings of `app_name`. The status code is not checked; an
    /// error page fails as a JSON error.
    pub fn get_app_settings(&self, app_name: &str) -> Result<Value> {
        let res = self.get(&format!("/applications/settings/{}", app_name))?;
        read_json(res)
    }

    /// Replace the settings of `app_name`. Anything but `200 OK` is returned
    /// as [`RestError::Status`], including other 2xx codes such as
    /// `201 Created` or `204 No Content`.
    pub fn put_app_settings(&self, app_name: &str, settings: &Value) -> Result<Value> {
        let url = self.url(&format!("/applications/settings/{}", app_name));
        debug!(%url, "PUT");
        let res = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(serde_json::to_vec(settings)?)
            .send()?;
        let status = res.status();
        if status != StatusCode::OK {
            return Err(RestError::Status { status, url });
        }
        read_json(res)
    }

    /// List up to 10 cluster nodes, or `None` when the server does not
    /// answer `200 OK` (for instance when clustering is disabled).
    pub fn get_cluster_nodes(&self) -> Result<Option<Value>> {
        let res = self.get(CLUSTER_NODES_PATH)?;
        let status = res.status();
        info!(%status, "cluster nodes status code");
        if status != StatusCode::OK {
            warn!(%status, "cluster node listing unavailable");
            return Ok(None);
        }
        read_json(res).map(Some)
    }

    /// Upload `file` as the war of application `app_name`. The file goes in
    /// a multipart form under the `file` field, named after its base name.
    pub fn install_app(&self, file: &Path, app_name: &str) -> Result<Value> {
        let handle = File::open(file)?;
        let len = handle.metadata()?.len();
        let file_name = file
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(app_name)
            .to_string();

        let part = multipart::Part::reader_with_length(handle, len).file_name(file_name);
        let form = multipart::Form::new().part("file", part);

        let url = self.url(&format!("/applications/{}", app_name));
        debug!(%url, path = %file.display(), "PUT multipart");
        let res = self.client.put(&url).multipart(form).send()?;
        info!(status = %res.status(), app = app_name, "install status code");
        read_json(res)
    }

    /// Delete application `app_name` and return the server's answer.
    pub fn delete_app(&self, app_name: &str) -> Result<Value> {
        let url = self.url(&format!("/applications/{}", app_name));
        debug!(%url, "DELETE");
        let res = self.client.delete(&url).send()?;
        info!(status = %res.status(), app = app_name, "delete status code");
        read_json(res)
    }

    fn get(&self, path: &str) -> Result<Response> {
        let url = self.url(path);
        debug!(%url, "GET");
        Ok(self.client.get(&url).send()?)
    }
}

/// Decode the body as JSON regardless of the status code.
fn read_json<T: DeserializeOwned>(res: Response) -> Result<T> {
    let body = res.text()?;
    Ok(serde_json::from_str(&body)?)
}
