//! Per-operation options and argument building
//!
//! Each struct lists every flag of one flux sub-command together with its
//! default. `args()` turns it into the exact argument vector passed to the
//! binary, so argument building can be tested without spawning anything.

use crate::error::FluxError;
use crate::resource::ReconcilableResource;
use crate::Result;
use serde::{Deserialize, Serialize};
use url::Url;

/// Namespace Flux installs its controllers into.
pub const DEFAULT_NAMESPACE: &str = "flux-system";

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_tag() -> String {
    "latest".to_string()
}

fn default_source_interval() -> String {
    "10m".to_string()
}

fn default_kustomization_interval() -> String {
    "5m".to_string()
}

fn default_true() -> bool {
    true
}

fn require_non_empty(argument: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FluxError::invalid_argument(argument, "must not be empty"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// install
// ---------------------------------------------------------------------------

/// Options for `flux install`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOptions {
    /// kubeconfig context; the flag is left out when absent or empty
    #[serde(default)]
    pub context: Option<String>,
}

impl InstallOptions {
    /// Create options for an install into the current kube context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the kubeconfig context
    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }

    /// Operation label used in logs and errors
    pub fn operation(&self) -> String {
        "install".to_string()
    }

    /// Build the argument vector
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["install".to_string()];
        if let Some(context) = self.context.as_deref().filter(|c| !c.is_empty()) {
            args.push("--context".to_string());
            args.push(context.to_string());
        }
        args
    }
}

// ---------------------------------------------------------------------------
// create source oci
// ---------------------------------------------------------------------------

/// Options for `flux create source oci`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OciSourceOptions {
    pub name: String,

    /// OCI repository URL, e.g. `oci://ghcr.io/stefanprodan/manifests/podinfo`
    pub url: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_tag")]
    pub tag: String,

    #[serde(default = "default_source_interval")]
    pub interval: String,
}

impl OciSourceOptions {
    /// Create options with the default namespace, tag and interval
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            namespace: default_namespace(),
            tag: default_tag(),
            interval: default_source_interval(),
        }
    }

    /// Set the namespace
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    /// Set the image tag to follow
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    /// Set the reconciliation interval
    pub fn with_interval(mut self, interval: &str) -> Self {
        self.interval = interval.to_string();
        self
    }

    /// Operation label used in logs and errors
    pub fn operation(&self) -> String {
        format!("create source oci {}", self.name)
    }

    /// Build the argument vector.
    ///
    /// Fails with [`FluxError::InvalidArgument`] when the name is empty or the
    /// URL is not an absolute URI. The URL is passed in its parsed form.
    pub fn args(&self) -> Result<Vec<String>> {
        require_non_empty("name", &self.name)?;
        let url = Url::parse(&self.url).map_err(|e| {
            FluxError::invalid_argument("url", format!("`{}` is not a valid URI: {e}", self.url))
        })?;

        Ok(vec![
            "create".to_string(),
            "source".to_string(),
            "oci".to_string(),
            self.name.clone(),
            "--url".to_string(),
            url.to_string(),
            "--tag".to_string(),
            self.tag.clone(),
            "--interval".to_string(),
            self.interval.clone(),
            "--namespace".to_string(),
            self.namespace.clone(),
        ])
    }
}

// ---------------------------------------------------------------------------
// create kustomization
// ---------------------------------------------------------------------------

/// Options for `flux create kustomization`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KustomizationOptions {
    pub name: String,

    /// Source reference, e.g. `OCIRepository/podinfo`
    pub source: String,

    /// Path inside the source; empty means the repository root
    #[serde(default)]
    pub path: String,

    /// Used for both `--namespace` and `--target-namespace`
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_kustomization_interval")]
    pub interval: String,

    /// Kustomizations this one depends on
    #[serde(default)]
    pub depends_on: Option<Vec<String>>,

    #[serde(default = "default_true")]
    pub prune: bool,

    #[serde(default = "default_true")]
    pub wait: bool,
}

impl KustomizationOptions {
    /// Create options with every flag at its default
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
            path: String::new(),
            namespace: default_namespace(),
            interval: default_kustomization_interval(),
            depends_on: None,
            prune: true,
            wait: true,
        }
    }

    /// Set the path inside the source
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Set the namespace
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    /// Set the reconciliation interval
    pub fn with_interval(mut self, interval: &str) -> Self {
        self.interval = interval.to_string();
        self
    }

    /// Set the Kustomizations this one depends on
    pub fn with_depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set whether removed objects are garbage collected
    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    /// Set whether flux waits for resources to become ready
    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    /// Operation label used in logs and errors
    pub fn operation(&self) -> String {
        format!("create kustomization {}", self.name)
    }

    /// Build the argument vector.
    ///
    /// `--depends-on` is always present; with no dependencies its value is
    /// the empty string.
    pub fn args(&self) -> Result<Vec<String>> {
        require_non_empty("name", &self.name)?;
        let depends_on = self
            .depends_on
            .as_ref()
            .map(|names| names.join(","))
            .unwrap_or_default();

        Ok(vec![
            "create".to_string(),
            "kustomization".to_string(),
            self.name.clone(),
            "--source".to_string(),
            self.source.clone(),
            "--path".to_string(),
            self.path.clone(),
            "--namespace".to_string(),
            self.namespace.clone(),
            "--target-namespace".to_string(),
            self.namespace.clone(),
            "--interval".to_string(),
            self.interval.clone(),
            "--prune".to_string(),
            self.prune.to_string(),
            "--wait".to_string(),
            self.wait.to_string(),
            "--depends-on".to_string(),
            depends_on,
        ])
    }
}

// ---------------------------------------------------------------------------
// reconcile
// ---------------------------------------------------------------------------

/// Options for `flux reconcile <kind> <name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOptions {
    pub resource: ReconcilableResource,

    pub name: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl ReconcileOptions {
    /// Create options for the default namespace
    pub fn new(resource: ReconcilableResource, name: &str) -> Self {
        Self {
            resource,
            name: name.to_string(),
            namespace: default_namespace(),
        }
    }

    /// Set the namespace
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    /// Operation label used in logs and errors
    pub fn operation(&self) -> String {
        format!("reconcile {} {}", self.resource, self.name)
    }

    /// Build the argument vector
    pub fn args(&self) -> Result<Vec<String>> {
        require_non_empty("name", &self.name)?;
        Ok(vec![
            "reconcile".to_string(),
            self.resource.as_str().to_string(),
            self.name.clone(),
            "--namespace".to_string(),
            self.namespace.clone(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(args: &[String]) -> Vec<&str> {
        args.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_install_without_context() {
        assert_eq!(InstallOptions::new().args(), vec!["install"]);
        assert_eq!(InstallOptions::new().with_context("").args(), vec!["install"]);
    }

    #[test]
    fn test_install_with_context() {
        let args = InstallOptions::new().with_context("kind-test").args();
        assert_eq!(strs(&args), ["install", "--context", "kind-test"]);
    }

    #[test]
    fn test_oci_source_defaults() {
        let opts = OciSourceOptions::new("podinfo", "oci://ghcr.io/stefanprodan/manifests/podinfo");
        assert_eq!(
            strs(&opts.args().unwrap()),
            [
                "create",
                "source",
                "oci",
                "podinfo",
                "--url",
                "oci://ghcr.io/stefanprodan/manifests/podinfo",
                "--tag",
                "latest",
                "--interval",
                "10m",
                "--namespace",
                "flux-system",
            ]
        );
    }

    #[test]
    fn test_oci_source_overrides() {
        let opts = OciSourceOptions::new("app", "oci://registry.local/app")
            .with_namespace("apps")
            .with_tag("v1.2.3")
            .with_interval("1m");
        let args = opts.args().unwrap();
        assert_eq!(
            strs(&args[6..]),
            ["--tag", "v1.2.3", "--interval", "1m", "--namespace", "apps"]
        );
    }

    #[test]
    fn test_oci_source_rejects_relative_url() {
        let err = OciSourceOptions::new("podinfo", "ghcr.io/podinfo")
            .args()
            .unwrap_err();
        match err {
            FluxError::InvalidArgument { argument, reason } => {
                assert_eq!(argument, "url");
                assert!(reason.contains("`ghcr.io/podinfo`"), "{reason}");
            }
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_oci_source_rejects_empty_url() {
        assert!(OciSourceOptions::new("podinfo", "").args().is_err());
    }

    #[test]
    fn test_oci_source_rejects_empty_name() {
        let err = OciSourceOptions::new("  ", "oci://ghcr.io/podinfo")
            .args()
            .unwrap_err();
        assert!(matches!(
            err,
            FluxError::InvalidArgument { ref argument, .. } if argument == "name"
        ));
    }

    #[test]
    fn test_kustomization_defaults() {
        let opts = KustomizationOptions::new("podinfo", "OCIRepository/podinfo");
        assert_eq!(
            strs(&opts.args().unwrap()),
            [
                "create",
                "kustomization",
                "podinfo",
                "--source",
                "OCIRepository/podinfo",
                "--path",
                "",
                "--namespace",
                "flux-system",
                "--target-namespace",
                "flux-system",
                "--interval",
                "5m",
                "--prune",
                "true",
                "--wait",
                "true",
                "--depends-on",
                "",
            ]
        );
    }

    #[test]
    fn test_kustomization_depends_on_joined() {
        let args = KustomizationOptions::new("apps", "OCIRepository/apps")
            .with_depends_on(["a", "b"])
            .args()
            .unwrap();
        let pos = args.iter().position(|a| a == "--depends-on").unwrap();
        assert_eq!(args[pos + 1], "a,b");
        assert_eq!(pos + 2, args.len());
    }

    #[test]
    fn test_kustomization_empty_depends_on_list_keeps_flag() {
        let args = KustomizationOptions::new("apps", "OCIRepository/apps")
            .with_depends_on(Vec::<String>::new())
            .args()
            .unwrap();
        assert_eq!(strs(&args[args.len() - 2..]), ["--depends-on", ""]);
    }

    #[test]
    fn test_kustomization_booleans_are_lowercase() {
        let args = KustomizationOptions::new("apps", "OCIRepository/apps")
            .with_prune(false)
            .with_wait(false)
            .args()
            .unwrap();
        let prune = args.iter().position(|a| a == "--prune").unwrap();
        let wait = args.iter().position(|a| a == "--wait").unwrap();
        assert_eq!(args[prune + 1], "false");
        assert_eq!(args[wait + 1], "false");
    }

    #[test]
    fn test_kustomization_namespace_sets_target_namespace() {
        let args = KustomizationOptions::new("apps", "OCIRepository/apps")
            .with_namespace("team-a")
            .with_path("./deploy")
            .with_interval("30s")
            .args()
            .unwrap();
        assert_eq!(
            strs(&args[5..13]),
            [
                "--path",
                "./deploy",
                "--namespace",
                "team-a",
                "--target-namespace",
                "team-a",
                "--interval",
                "30s",
            ]
        );
    }

    #[test]
    fn test_reconcile_kustomization_defaults() {
        let opts = ReconcileOptions::new(ReconcilableResource::Kustomization, "podinfo");
        assert_eq!(
            strs(&opts.args().unwrap()),
            ["reconcile", "kustomization", "podinfo", "--namespace", "flux-system"]
        );
        assert_eq!(opts.operation(), "reconcile kustomization podinfo");
    }

    #[test]
    fn test_reconcile_source_custom_namespace() {
        let opts =
            ReconcileOptions::new(ReconcilableResource::Source, "podinfo").with_namespace("apps");
        assert_eq!(
            strs(&opts.args().unwrap()),
            ["reconcile", "source", "podinfo", "--namespace", "apps"]
        );
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let json = r#"{"name": "podinfo", "source": "OCIRepository/podinfo"}"#;
        let opts: KustomizationOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts, KustomizationOptions::new("podinfo", "OCIRepository/podinfo"));

        let opts: ReconcileOptions =
            serde_json::from_str(r#"{"resource": "source", "name": "podinfo"}"#).unwrap();
        assert_eq!(opts.namespace, DEFAULT_NAMESPACE);
    }
}
