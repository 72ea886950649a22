// RESTCONF operation (RPC) invocation.
//
// `POST /restconf/operations/<module>:<rpc>` with an `{"input": {...}}`
// envelope. Controllers answer with no content or with an
// `{"<module>:output": {...}}` document.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::classify::classify;
use crate::client::{Client, decode};
use crate::context::RequestContext;
use crate::endpoint;
use crate::error::Error;

/// Request envelope for an RPC.
#[derive(Debug, Serialize)]
pub struct RpcInput<'a, I> {
    pub input: &'a I,
}

impl Client {
    /// Invoke `rpc` (a module-qualified name such as
    /// `Cisco-IOS-XE-wireless-access-point-cmd-rpc:set-ap-admin-state`).
    ///
    /// Returns `Ok(None)` for HTTP 204 or an empty 200 body. Otherwise the
    /// `output` member (bare or module-qualified) is decoded as `O`; a body
    /// without one is decoded whole.
    pub async fn rpc<I, O>(
        &self,
        ctx: &RequestContext,
        rpc: &str,
        input: &I,
    ) -> Result<Option<O>, Error>
    where
        I: Serialize + Sync,
        O: DeserializeOwned,
    {
        let url = self.url_for(&rpc_path(rpc));
        let body = serde_json::to_vec(&RpcInput { input }).map_err(Error::Serialization)?;

        self.logger()
            .scope(async {
                let raw = self.round_trip(ctx, Method::POST, &url, Some(body)).await?;
                if raw.status == 204 {
                    return Ok(None);
                }
                classify(raw.status, &raw.body, &url)?;
                if raw.body.trim().is_empty() {
                    return Ok(None);
                }

                let doc: Value = decode(&url, raw.body.clone())?;
                let output = unwrap_output(doc);
                serde_json::from_value(output).map(Some).map_err(|e| {
                    tracing::error!(url, error = %e, "failed to unmarshal rpc output");
                    Error::Deserialization {
                        message: e.to_string(),
                        body: raw.body,
                    }
                })
            })
            .await
    }
}

fn rpc_path(rpc: &str) -> String {
    let bare = rpc.strip_prefix('/').unwrap_or(rpc);
    if bare.starts_with("restconf/") {
        rpc.to_owned()
    } else {
        endpoint::operations_path(bare)
    }
}

/// Pull the `output` (or `<module>:output`) member out of a reply.
fn unwrap_output(doc: Value) -> Value {
    match doc {
        Value::Object(mut map) => {
            let key = map
                .keys()
                .find(|k| *k == "output" || k.ends_with(":output"))
                .cloned();
            match key.and_then(|k| map.remove(&k)) {
                Some(output) => output,
                None => Value::Object(map),
            }
        }
        other => other,
    }
}
