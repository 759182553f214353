use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use wffbuild::errors::Result;
use wffbuild::exec::{InvocationResult, ToolInvocation, ToolInvoker};

/// A fake tool invoker that:
/// - records every invocation, in order
/// - exits 1 for targets whose file name contains `bad`
/// - exits 0 for everything else
/// - optionally cannot run at all for targets containing a given name.
#[derive(Debug, Clone, Default)]
pub struct FakeToolInvoker {
    calls: Arc<Mutex<Vec<ToolInvocation>>>,
    unrunnable: Option<String>,
}

impl FakeToolInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return an error, as if the tool could not be spawned, for targets
    /// whose file name contains `name`.
    pub fn unrunnable_for(mut self, name: &str) -> Self {
        self.unrunnable = Some(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }

    /// File names of the invoked targets, in order.
    pub fn invoked_files(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|c| c.target.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl ToolInvoker for FakeToolInvoker {
    fn invoke<'a>(
        &'a self,
        invocation: &'a ToolInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<InvocationResult>> + Send + 'a>> {
        self.calls.lock().unwrap().push(invocation.clone());

        let name = invocation
            .target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.unrunnable.as_deref().is_some_and(|u| name.contains(u)) {
            let result: Result<InvocationResult> =
                Err(anyhow::anyhow!("spawn failed for {name}").into());
            return Box::pin(async move { result });
        }

        let failed = name.contains("bad");
        let result = InvocationResult {
            target: invocation.target.clone(),
            exit_code: if failed { 1 } else { 0 },
            output: if failed {
                format!("{name}: invalid watch face element\n")
            } else {
                format!("{name}: passed\n")
            },
        };

        Box::pin(async move { Ok(result) })
    }
}
