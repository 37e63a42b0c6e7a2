//! Node-API bindings for JavaScript bundler hosts.

use napi_derive::napi;
use std::path::Path;

use crate::error::TransformError;
use crate::options::PluginOptions;
use crate::pipeline::SfcPlugin;

#[napi(object)]
pub struct NativeTransformResult {
    pub code: String,
}

fn to_napi_error(err: TransformError) -> napi::Error {
    let reason = match &err {
        // Hosts parse the JSON to show code frames.
        TransformError::Compile(e) => serde_json::to_string(e).unwrap_or_else(|_| e.to_string()),
        other => other.to_string(),
    };
    napi::Error::from_reason(reason)
}

#[napi]
pub struct SfcPluginNative {
    inner: SfcPlugin,
}

#[napi]
impl SfcPluginNative {
    /// `options_json` is a `PluginOptions` object serialized by the host.
    #[napi(constructor)]
    pub fn new(options_json: Option<String>) -> napi::Result<Self> {
        let options = match options_json {
            Some(json) => PluginOptions::from_json(&json).map_err(to_napi_error)?,
            None => PluginOptions::default(),
        };
        let inner = SfcPlugin::new(options).map_err(to_napi_error)?;
        Ok(SfcPluginNative { inner })
    }

    #[napi]
    pub fn transform(&self, code: String, id: String) -> napi::Result<Option<NativeTransformResult>> {
        let output = self.inner.transform(&code, &id).map_err(to_napi_error)?;
        Ok(output.map(|o| NativeTransformResult { code: o.code }))
    }

    #[napi]
    pub fn load(&self, id: String) -> napi::Result<Option<String>> {
        self.inner.load(&id).map_err(to_napi_error)
    }

    #[napi]
    pub fn invalidate(&self, path: String) -> bool {
        self.inner.handle_file_change(&path)
    }

    #[napi]
    pub fn warm(&self, dir: String) -> u32 {
        js_count(self.inner.warm(Path::new(&dir)))
    }
}

/// Counts cross to JS as `u32`; larger values saturate.
fn js_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
