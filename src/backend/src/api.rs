use crate::{
    device::Device,
    http_client::{ServiceResultResponse, handle_service_result},
};
use actix_files::{Files, NamedFile};
use actix_web::{
    HttpResponse, Responder,
    dev::{ServiceRequest, ServiceResponse, fn_service},
    error::InternalError,
    web,
};
use anyhow::{Context, anyhow};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};
use switch_control_core::{ChannelConfig, SwitchAction, WifiConfig};

#[derive(Debug, Deserialize)]
pub struct ChannelQuery {
    channel: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn bad_request(error: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorBody {
        error: error.into(),
    })
}

/// Reply to an accepted Wi-Fi configuration
#[derive(Serialize)]
pub struct WifiAccepted {
    #[serde(rename = "Status")]
    status: &'static str,
}

impl ServiceResultResponse for WifiAccepted {
    fn into_response(self) -> HttpResponse {
        HttpResponse::Ok().json(self)
    }
}

#[derive(Clone)]
pub struct Api {
    pub device: Arc<Device>,
}

impl Api {
    pub fn new(device: Arc<Device>) -> Self {
        Api { device }
    }

    /// Register the `/api` routes
    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.app_data(json_config())
            .route("/api/config", web::get().to(Api::get_config))
            .route("/api/config", web::post().to(Api::set_config))
            .route("/api/status", web::get().to(Api::status))
            .route("/api/channel", web::get().to(Api::channel_status))
            .route("/api/channel", web::post().to(Api::switch_channel))
            .route("/api/wifi", web::get().to(Api::get_wifi))
            .route("/api/wifi", web::post().to(Api::set_wifi));
    }

    pub async fn get_config(
        api: web::Data<Self>,
        query: web::Query<ChannelQuery>,
    ) -> impl Responder {
        debug!("get_config() called: {query:?}");

        let Some(channel) = query.channel.as_deref().filter(|c| !c.is_empty()) else {
            return handle_service_result(api.device.channels(), "get_config");
        };

        match api.device.channel(channel) {
            Ok(Some(config)) => config.into_response(),
            Ok(None) => HttpResponse::NotFound().json(ErrorBody {
                error: format!("unknown channel {channel}"),
            }),
            Err(e) => handle_service_result::<()>(Err(e), "get_config"),
        }
    }

    pub async fn set_config(
        body: web::Json<ChannelConfig>,
        api: web::Data<Self>,
    ) -> impl Responder {
        debug!("set_config() called: {body:?}");

        let config = body.into_inner();
        if let Err(e) = config.validate() {
            warn!("rejected config for channel {}: {e}", config.channel);
            return bad_request(e);
        }

        handle_service_result(api.device.save_channel(config), "set_config")
    }

    pub async fn status(api: web::Data<Self>) -> impl Responder {
        debug!("status() called");

        handle_service_result(api.device.status(), "status")
    }

    pub async fn channel_status(api: web::Data<Self>) -> impl Responder {
        handle_service_result(api.device.servo_status(), "channel_status")
    }

    pub async fn switch_channel(
        body: web::Json<SwitchAction>,
        api: web::Data<Self>,
    ) -> impl Responder {
        debug!("switch_channel() called: {body:?}");

        let action = body.into_inner();
        if let Err(e) = action.validate() {
            warn!("rejected switch action for channel {}: {e}", action.channel);
            return bad_request(e);
        }

        handle_service_result(api.device.switch(action), "switch_channel")
    }

    pub async fn get_wifi(api: web::Data<Self>) -> impl Responder {
        debug!("get_wifi() called");

        handle_service_result(api.device.wifi_config(), "get_wifi")
    }

    /// Any failure, including an unparsable or invalid body, is answered with 500
    pub async fn set_wifi(body: web::Bytes, api: web::Data<Self>) -> impl Responder {
        debug!("set_wifi() called");

        let result = serde_json::from_slice::<WifiConfig>(&body)
            .context("failed to parse wifi config")
            .and_then(|config| {
                config.validate().map_err(|e| anyhow!(e))?;
                api.device.save_wifi(config)
            })
            .map(|_| WifiAccepted { status: "Accepted" });

        handle_service_result(result, "set_wifi")
    }
}

/// JSON extractor config answering malformed bodies with `400 {"error"}`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    })
}

/// Serve the web UI from `dist_dir`; unknown paths get `index.html`
pub fn ui_files(dist_dir: &Path) -> Files {
    let index = dist_dir.join("index.html");

    Files::new("/", dist_dir)
        .index_file("index.html")
        .default_handler(fn_service(move |req: ServiceRequest| {
            let index = index.clone();
            async move {
                let (req, _) = req.into_parts();
                let file = NamedFile::open_async(index).await?;
                let res = file.into_response(&req);
                Ok::<_, actix_web::Error>(ServiceResponse::new(req, res))
            }
        }))
}
