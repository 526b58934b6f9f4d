/// Macro for model field updates with automatic rendering.
/// Supports both single and multiple field updates.
///
/// # Examples
///
/// Single field update:
/// ```ignore
/// update_field!(model.success_message, None)
/// ```
///
/// Multiple field updates:
/// ```ignore
/// update_field!(
///     model.error_message, None;
///     model.success_message, None
/// )
/// ```
#[macro_export]
macro_rules! update_field {
    // Multiple field updates (must come first to match the pattern)
    ($($model_field:expr, $value:expr);+ $(;)?) => {{
        let mut changed = false;
        $(
            let value = $value;
            if $model_field != value {
                $model_field = value;
                changed = true;
            }
        )+
        if changed {
            crux_core::render::render()
        } else {
            crux_core::Command::done()
        }
    }};

    // Single field update
    ($model_field:expr, $value:expr) => {{
        update_field!($model_field, $value;)
    }};
}

// Re-export http_helpers functions for macro use
pub use crate::http_helpers::{
    build_url, check_response_status, extract_error_message, handle_request_error,
    is_response_success, parse_json_response, process_json_response, process_status_response,
    BASE_URL,
};

/// Macro for GET requests expecting a JSON response, guarded by the in-flight set.
///
/// The request is only issued if `resource` is idle; otherwise nothing happens.
///
/// NOTE: URLs are prefixed with `https://relative`.
/// `crux_http` requires absolute URLs and rejects relative paths.
/// The UI shell strips this prefix before sending requests.
///
/// # Patterns
///
/// Pattern 1: Response wrapped into a domain event
/// ```ignore
/// http_get!(Wifi, WifiEvent, model, Resource::Wifi, "/api/wifi", FetchWifiResponse, "Fetch Wi-Fi",
///     expect_json: WifiConfig
/// )
/// ```
///
/// Pattern 2: Custom event mapping
/// ```ignore
/// http_get!(model, Resource::ChannelStatus, "/api/channel", "Fetch channel status",
///     expect_json: Vec<ServoStatus>,
///     then: move |result| Event::Channel(ChannelEvent::ChannelStatusResponse { silent, result })
/// )
/// ```
#[macro_export]
macro_rules! http_get {
    // Pattern 1: Response wrapped into a domain event
    ($domain:ident, $domain_event:ident, $model:expr, $resource:expr, $endpoint:expr, $response_event:ident, $action:expr, expect_json: $response_type:ty) => {
        $crate::http_get!($model, $resource, $endpoint, $action,
            expect_json: $response_type,
            then: |result| $crate::events::Event::$domain(
                $crate::events::$domain_event::$response_event(result),
            )
        )
    };

    // Pattern 2: Custom event mapping
    ($model:expr, $resource:expr, $endpoint:expr, $action:expr, expect_json: $response_type:ty, then: $mapper:expr) => {{
        let resource = $resource;
        if $model.begin_request(resource.clone()) {
            let action = $action;
            let mapper = $mapper;
            crux_core::Command::all([
                crux_core::render::render(),
                $crate::HttpCmd::get($crate::build_url($endpoint))
                    .build()
                    .then_send(move |result| {
                        let event_result: Result<$response_type, String> =
                            $crate::process_json_response(&action, result);
                        mapper(event_result)
                    }),
            ])
        } else {
            log::debug!("{resource:?} already in flight, request dropped");
            crux_core::Command::done()
        }
    }};
}

/// Macro for POST requests with a JSON body, guarded by the in-flight set.
///
/// Only the response status is checked. The mapper receives `Result<(), String>`.
///
/// # Example
/// ```ignore
/// http_post!(model, Resource::SaveWifi, "/api/wifi", "Save Wi-Fi",
///     body_json: &config,
///     then: move |result| Event::Wifi(WifiEvent::UpdateWifiResponse { config, result })
/// )
/// ```
#[macro_export]
macro_rules! http_post {
    ($model:expr, $resource:expr, $endpoint:expr, $action:expr, body_json: $body:expr, then: $mapper:expr) => {{
        let resource = $resource;
        if $model.begin_request(resource.clone()) {
            let action = $action;
            match $crate::HttpCmd::post($crate::build_url($endpoint))
                .header("Content-Type", "application/json")
                .body_json($body)
            {
                Ok(builder) => {
                    let mapper = $mapper;
                    crux_core::Command::all([
                        crux_core::render::render(),
                        builder.build().then_send(move |result| {
                            mapper($crate::process_status_response(&action, result))
                        }),
                    ])
                }
                Err(e) => {
                    $model.in_flight.finish(&resource);
                    $crate::handle_request_error($model, &action, e)
                }
            }
        } else {
            log::debug!("{resource:?} already in flight, request dropped");
            crux_core::Command::done()
        }
    }};
}

/// Macro for handling response events: releases the resource, then applies the result.
///
/// Failures are logged and surfaced in `error_message` unless `silent` is set.
///
/// # Patterns
///
/// Pattern 1: Custom success handling
/// ```ignore
/// handle_response!(model, Resource::Wifi, result, {
///     on_success: |m, config| {
///         m.confirm_wifi(config);
///     },
/// })
/// ```
///
/// Pattern 2: Custom success handler + success message
/// ```ignore
/// handle_response!(model, Resource::SaveWifi, result, {
///     on_success: |m, _| {
///         m.confirm_wifi(config);
///     },
///     success_message: "Wi-Fi saved",
/// })
/// ```
///
/// Pattern 3: Background request, failures are only logged
/// ```ignore
/// handle_response!(model, Resource::ChannelStatus, result, {
///     on_success: |m, status| {
///         m.channel_status = status;
///     },
///     silent: true,
/// })
/// ```
#[macro_export]
macro_rules! handle_response {
    // Pattern 1: Only custom success handler
    ($model:expr, $resource:expr, $result:expr, {
        on_success: |$success_model:ident, $value:tt| $success_body:block $(,)?
    }) => {{
        $model.finish_request(&$resource);
        match $result {
            Ok($value) => {
                let $success_model = &mut *$model;
                $success_body
            }
            Err(e) => {
                log::error!("{e}");
                $model.set_error(e);
            }
        }
        crux_core::render::render()
    }};

    // Pattern 2: Custom success handler + success message
    ($model:expr, $resource:expr, $result:expr, {
        on_success: |$success_model:ident, $value:tt| $success_body:block,
        success_message: $msg:expr $(,)?
    }) => {{
        $model.finish_request(&$resource);
        match $result {
            Ok($value) => {
                let $success_model = &mut *$model;
                $success_body
                $model.success_message = Some($msg.to_string());
            }
            Err(e) => {
                log::error!("{e}");
                $model.set_error(e);
            }
        }
        crux_core::render::render()
    }};

    // Pattern 3: Background request, errors are only logged
    ($model:expr, $resource:expr, $result:expr, {
        on_success: |$success_model:ident, $value:tt| $success_body:block,
        silent: true $(,)?
    }) => {{
        $model.finish_request(&$resource);
        match $result {
            Ok($value) => {
                let $success_model = &mut *$model;
                $success_body
            }
            Err(e) => {
                log::warn!("{e}");
            }
        }
        crux_core::render::render()
    }};
}
