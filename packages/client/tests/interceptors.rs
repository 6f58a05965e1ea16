use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use courier_client::adapter::{Adapter, from_fn, settle};
use courier_client::error::{self, Error, Kind};
use courier_client::interceptor::{Handler, InterceptorOptions};
use courier_client::{HttpClient, RequestConfig, Response};

type Log = Arc<Mutex<Vec<String>>>;

fn push(log: &Log, entry: &str) {
    log.lock().unwrap().push(entry.to_string());
}

fn recording_transport(log: Log, calls: Arc<AtomicUsize>) -> Adapter {
    from_fn(move |config: RequestConfig, _cancel| {
        calls.fetch_add(1, Ordering::SeqCst);
        push(&log, "dispatch");
        async move { settle(Response::new(200, "ok"), &config) }
    })
}

fn client_with(adapter: Adapter) -> HttpClient {
    HttpClient::new().create(RequestConfig::new().adapter(adapter))
}

#[tokio::test]
async fn request_chain_runs_newest_first_and_response_chain_in_order() {
    let log: Log = Arc::default();
    let client = client_with(recording_transport(log.clone(), Arc::default()));

    for name in ["R1", "R2"] {
        let log = log.clone();
        client.interceptors().request.add(
            Handler::from_fn(move |config: RequestConfig| {
                push(&log, name);
                Ok(config)
            }),
            None,
            InterceptorOptions::default(),
        );
    }
    for name in ["S1", "S2"] {
        let log = log.clone();
        client.interceptors().response.add(
            Handler::from_fn(move |response: Response| {
                push(&log, name);
                Ok(response)
            }),
            None,
            InterceptorOptions::default(),
        );
    }

    client.request(RequestConfig::new().url("/x")).await.unwrap();
    assert_eq!(*log.lock().unwrap(), ["R2", "R1", "dispatch", "S1", "S2"]);
}

#[tokio::test]
async fn ejected_interceptors_do_not_run() {
    let log: Log = Arc::default();
    let client = client_with(recording_transport(log.clone(), Arc::default()));

    let handle = {
        let log = log.clone();
        client.interceptors().request.add(
            Handler::from_fn(move |config: RequestConfig| {
                push(&log, "ejected");
                Ok(config)
            }),
            None,
            InterceptorOptions::default(),
        )
    };
    assert!(client.interceptors().request.eject(handle));

    client.request(RequestConfig::new().url("/x")).await.unwrap();
    assert_eq!(*log.lock().unwrap(), ["dispatch"]);
}

#[tokio::test]
async fn eject_leaves_requests_already_started_untouched() {
    let log: Log = Arc::default();
    let client = client_with(recording_transport(log.clone(), Arc::default()));

    let handle = {
        let log = log.clone();
        client.interceptors().request.add(
            Handler::from_async(move |config: RequestConfig| {
                let log = log.clone();
                async move {
                    push(&log, "A");
                    Ok(config)
                }
            }),
            None,
            InterceptorOptions::default(),
        )
    };

    let in_flight = client.request(RequestConfig::new().url("/first"));
    assert!(client.interceptors().request.eject(handle));
    in_flight.await.unwrap();
    assert_eq!(*log.lock().unwrap(), ["A", "dispatch"]);

    client.request(RequestConfig::new().url("/second")).await.unwrap();
    assert_eq!(*log.lock().unwrap(), ["A", "dispatch", "dispatch"]);
}

#[tokio::test]
async fn run_when_skips_non_matching_requests() {
    let log: Log = Arc::default();
    let client = client_with(recording_transport(log.clone(), Arc::default()));

    let tagged = log.clone();
    client.interceptors().request.add(
        Handler::from_fn(move |config: RequestConfig| {
            push(&tagged, "admin-only");
            Ok(config)
        }),
        None,
        InterceptorOptions::default()
            .run_when(|config| config.url.as_deref().is_some_and(|url| url.starts_with("/admin"))),
    );

    client.request(RequestConfig::new().url("/public")).await.unwrap();
    client.request(RequestConfig::new().url("/admin/users")).await.unwrap();
    assert_eq!(*log.lock().unwrap(), ["dispatch", "admin-only", "dispatch"]);
}

#[tokio::test]
async fn synchronous_chain_dispatches_before_polling() {
    let calls = Arc::new(AtomicUsize::new(0));
    let client = client_with(recording_transport(Arc::default(), calls.clone()));
    client.interceptors().request.add(
        Handler::from_fn(|config: RequestConfig| Ok(config.header("X-Sync", "1"))),
        None,
        InterceptorOptions::synchronous(),
    );

    let pending = client.request(RequestConfig::new().url("/x"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(pending.await.unwrap().status, 200);
}

#[tokio::test]
async fn asynchronous_chain_waits_for_polling() {
    let calls = Arc::new(AtomicUsize::new(0));
    let client = client_with(recording_transport(Arc::default(), calls.clone()));
    client.interceptors().request.add(
        Handler::from_async(|config: RequestConfig| async move { Ok(config) }),
        None,
        InterceptorOptions::default(),
    );

    let pending = client.request(RequestConfig::new().url("/x"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    pending.await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_request_interceptor_skips_dispatch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let client = client_with(recording_transport(Arc::default(), calls.clone()));
    client.interceptors().request.add(
        Handler::from_fn(|_config: RequestConfig| Err(error::interceptor("missing credentials"))),
        None,
        InterceptorOptions::default(),
    );

    let err = client.request(RequestConfig::new().url("/x")).await.unwrap_err();
    assert_eq!(err.kind(), Kind::Interceptor);
    assert_eq!(err.to_string(), "missing credentials");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rejection_handler_can_recover_a_bad_status() {
    let failing = from_fn(|config: RequestConfig, _cancel| async move {
        settle(Response::new(404, "missing"), &config)
    });
    let client = client_with(failing);
    client.interceptors().response.add(
        Handler::from_fn(Ok),
        Some(Handler::from_fn(|err: Error| match err.response().cloned() {
            Some(response) => Ok(response),
            None => Err(err),
        })),
        InterceptorOptions::default(),
    );

    let response = client.request(RequestConfig::new().url("/x")).await.unwrap();
    assert_eq!(response.status, 404);
}

#[tokio::test]
async fn cleared_registry_runs_nothing() {
    let log: Log = Arc::default();
    let client = client_with(recording_transport(log.clone(), Arc::default()));
    let tagged = log.clone();
    client.interceptors().response.add(
        Handler::from_fn(move |response: Response| {
            push(&tagged, "S");
            Ok(response)
        }),
        None,
        InterceptorOptions::default(),
    );
    client.interceptors().response.clear();

    client.request(RequestConfig::new().url("/x")).await.unwrap();
    assert_eq!(*log.lock().unwrap(), ["dispatch"]);
}
