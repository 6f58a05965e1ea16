use courier_client::adapter::{self, AdapterRegistry, Registration, from_fn};
use courier_client::config::default_adapter;
use courier_client::error::Kind;
use courier_client::{AdapterSpec, HttpClient, RequestConfig, Response};
use serde_json::json;

async fn failure_kind(spec: AdapterSpec) -> Kind {
    let config = RequestConfig::new().url("/x").adapter(spec);
    match HttpClient::new().request(config).await {
        Ok(response) => panic!("expected adapter failure, got {}", response.status),
        Err(err) => {
            assert!(err.is_adapter_error());
            err.kind()
        }
    }
}

#[tokio::test]
async fn resolution_failures_are_distinguishable() {
    assert_eq!(failure_kind("nonexistent".into()).await, Kind::UnknownAdapter);
    assert_eq!(failure_kind(AdapterSpec::Disabled).await, Kind::NotSupported);
    assert_eq!(failure_kind(AdapterSpec::Value(json!({"send": "yes"}))).await, Kind::InvalidAdapter);
    assert_eq!(failure_kind("fetch".into()).await, Kind::AdapterUnavailable);
    assert_eq!(failure_kind("xhr".into()).await, Kind::NotSupported);
}

#[test]
fn default_candidates_fall_back_to_the_socket_transport() {
    let resolved = adapter::global().resolve(&default_adapter()).unwrap();
    assert_eq!(resolved.name(), "http");

    let by_name = adapter::get_adapter(&AdapterSpec::from("HTTP")).unwrap();
    assert_eq!(by_name.name(), "http");
}

#[test]
fn custom_registries_resolve_their_own_names() {
    let registry = AdapterRegistry::with_defaults().register(
        "mock",
        Registration::Available(from_fn(|_config, _cancel| async { Ok(Response::new(204, "")) })),
    );
    assert!(registry.resolve(&AdapterSpec::from("Mock")).is_ok());
    assert_eq!(
        AdapterRegistry::new().resolve(&AdapterSpec::from("http")).err().map(|e| e.kind()),
        Some(Kind::UnknownAdapter)
    );
}

#[tokio::test]
async fn transports_given_by_reference_are_used_directly() {
    let direct = from_fn(|_config, _cancel| async { Ok(Response::new(201, "made")) });
    let spec = AdapterSpec::List(vec!["xhr".into(), direct.into()]);
    let response = HttpClient::new()
        .request(RequestConfig::new().url("/x").adapter(spec))
        .await
        .unwrap();
    assert_eq!(response.status, 201);
}
