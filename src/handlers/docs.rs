use axum::{response::Html, Json};
use serde_json::{json, Map, Value};

/// (method, path, summary) for every documented route.
const ROUTES: &[(&str, &str, &str)] = &[
    ("get", "/health", "Liveness and cache reachability"),
    ("get", "/api/status", "Live reachability and version of both upstreams"),
    ("get", "/api/sonarr/status", "Sonarr system status"),
    ("get", "/api/sonarr/series", "All series in Sonarr"),
    ("post", "/api/sonarr/series", "Add a series to Sonarr"),
    ("get", "/api/sonarr/series/lookup", "Search for new series by term"),
    ("get", "/api/sonarr/series/{id}", "A single series"),
    ("delete", "/api/sonarr/series/{id}", "Remove a series (deleteFiles query flag)"),
    ("post", "/api/sonarr/series/{id}/search", "Trigger an indexer search for a series"),
    ("get", "/api/sonarr/queue", "Sonarr download queue"),
    ("get", "/api/sonarr/calendar", "Episodes airing between start and end"),
    ("get", "/api/sonarr/rootfolders", "Sonarr root folders"),
    ("get", "/api/sonarr/qualityprofiles", "Sonarr quality profiles"),
    ("get", "/api/radarr/status", "Radarr system status"),
    ("get", "/api/radarr/movies", "All movies in Radarr"),
    ("post", "/api/radarr/movies", "Add a movie to Radarr"),
    ("get", "/api/radarr/movies/lookup", "Search for new movies by term"),
    ("get", "/api/radarr/movies/{id}", "A single movie"),
    ("delete", "/api/radarr/movies/{id}", "Remove a movie (deleteFiles query flag)"),
    ("post", "/api/radarr/movies/{id}/search", "Trigger an indexer search for a movie"),
    ("get", "/api/radarr/queue", "Radarr download queue"),
    ("get", "/api/radarr/calendar", "Movies releasing between start and end"),
    ("get", "/api/radarr/rootfolders", "Radarr root folders"),
    ("get", "/api/radarr/qualityprofiles", "Radarr quality profiles"),
    ("delete", "/api/cache", "Flush cached responses for both upstreams"),
    ("delete", "/api/cache/{service}", "Flush cached responses for one upstream"),
    ("post", "/api/jobs/cache-warm", "Queue a cache warm job"),
    ("get", "/api/jobs/{id}", "Status of a background job"),
    ("get", "/media", "Stream the configured media file"),
];

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>arr-proxy API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI)
}

pub async fn openapi_spec() -> Json<Value> {
    Json(openapi_document())
}

pub fn openapi_document() -> Value {
    let mut paths = Map::new();

    for (method, path, summary) in ROUTES {
        let mut operation = json!({
            "summary": summary,
            "responses": { "default": { "description": "JSON response" } },
        });

        let parameters = path_parameters(path);
        if !parameters.is_empty() {
            operation["parameters"] = Value::Array(parameters);
        }

        let entry = paths
            .entry(path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(methods) = entry {
            methods.insert(method.to_string(), operation);
        }
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "arr-proxy",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Caching proxy in front of Sonarr and Radarr",
        },
        "paths": paths,
    })
}

fn path_parameters(path: &str) -> Vec<Value> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
        .map(|name| {
            json!({
                "name": name,
                "in": "path",
                "required": true,
                "schema": { "type": "string" },
            })
        })
        .collect()
}
