//! Verb shorthands

use super::HttpClient;
use crate::config::{RequestConfig, merge_config};
use crate::dispatch::ResponseFuture;
use crate::http::{Body, Method};

impl HttpClient {
    pub fn get(&self, url: &str, config: Option<RequestConfig>) -> ResponseFuture {
        self.without_data(Method::Get, url, config)
    }

    pub fn delete(&self, url: &str, config: Option<RequestConfig>) -> ResponseFuture {
        self.without_data(Method::Delete, url, config)
    }

    pub fn head(&self, url: &str, config: Option<RequestConfig>) -> ResponseFuture {
        self.without_data(Method::Head, url, config)
    }

    pub fn options(&self, url: &str, config: Option<RequestConfig>) -> ResponseFuture {
        self.without_data(Method::Options, url, config)
    }

    pub fn post(&self, url: &str, data: impl Into<Body>, config: Option<RequestConfig>) -> ResponseFuture {
        self.with_data(Method::Post, url, data.into(), config, false)
    }

    pub fn put(&self, url: &str, data: impl Into<Body>, config: Option<RequestConfig>) -> ResponseFuture {
        self.with_data(Method::Put, url, data.into(), config, false)
    }

    pub fn patch(&self, url: &str, data: impl Into<Body>, config: Option<RequestConfig>) -> ResponseFuture {
        self.with_data(Method::Patch, url, data.into(), config, false)
    }

    /// `post` with `Content-Type: multipart/form-data`.
    pub fn post_form(&self, url: &str, data: impl Into<Body>, config: Option<RequestConfig>) -> ResponseFuture {
        self.with_data(Method::Post, url, data.into(), config, true)
    }

    /// `put` with `Content-Type: multipart/form-data`.
    pub fn put_form(&self, url: &str, data: impl Into<Body>, config: Option<RequestConfig>) -> ResponseFuture {
        self.with_data(Method::Put, url, data.into(), config, true)
    }

    /// `patch` with `Content-Type: multipart/form-data`.
    pub fn patch_form(&self, url: &str, data: impl Into<Body>, config: Option<RequestConfig>) -> ResponseFuture {
        self.with_data(Method::Patch, url, data.into(), config, true)
    }

    fn without_data(&self, method: Method, url: &str, config: Option<RequestConfig>) -> ResponseFuture {
        let overrides = RequestConfig::new().method(method).url(url);
        self.request(merge_config(&config.unwrap_or_default(), &overrides))
    }

    fn with_data(
        &self,
        method: Method,
        url: &str,
        data: Body,
        config: Option<RequestConfig>,
        multipart: bool,
    ) -> ResponseFuture {
        let mut overrides = RequestConfig::new().method(method).url(url).data(data);
        if multipart {
            overrides = overrides.header("Content-Type", "multipart/form-data");
        }
        self.request(merge_config(&config.unwrap_or_default(), &overrides))
    }
}
