//! macOS Keychain secret provider
//!
//! Reads generic passwords through the `security` command-line helper:
//!
//! ```text
//! security find-generic-password -s <service> -a <name> -w
//! ```

use std::sync::Arc;

use crate::logging::{NoOpLogger, SharedLogger};
use crate::types::{CancellationToken, SecretRequest};
use crate::{log_debug, log_warn};
use super::command::{CommandOutput, CommandRunner, SystemCommandRunner};
use super::error::{SecretError, SecretResult};
use super::traits::SecretProvider;

/// Default keychain service namespace
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "devopsmaestro";

/// Request option that overrides the service namespace
pub const SERVICE_OPTION: &str = "service";

/// `security` exits with errSecItemNotFound (44) when no item matches
pub const DEFAULT_NOT_FOUND_EXIT_CODES: &[i32] = &[44];

/// stderr phrases `security` prints when no item matches
pub const DEFAULT_NOT_FOUND_PHRASES: &[&str] = &[
    "could not be found in the keychain",
    "The specified item could not be found",
];

/// Configuration for `KeychainProvider`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeychainConfig {
    /// Service namespace, overridable per request with the `service` option
    pub service: String,
    /// Helper binary to invoke
    pub program: String,
    /// Exit codes classified as "not found"
    pub not_found_exit_codes: Vec<i32>,
    /// stderr substrings classified as "not found" when the exit code is not recognised
    pub not_found_phrases: Vec<String>,
}

impl Default for KeychainConfig {
    fn default() -> Self {
        Self {
            service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
            program: "security".to_string(),
            not_found_exit_codes: DEFAULT_NOT_FOUND_EXIT_CODES.to_vec(),
            not_found_phrases: DEFAULT_NOT_FOUND_PHRASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl KeychainConfig {
    /// Use a different service namespace
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Add a stderr phrase that means "not found"
    pub fn with_not_found_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.not_found_phrases.push(phrase.into());
        self
    }

    /// Add an exit code that means "not found"
    pub fn with_not_found_exit_code(mut self, code: i32) -> Self {
        self.not_found_exit_codes.push(code);
        self
    }
}

/// Secret provider backed by the macOS Keychain
///
/// Only available on macOS. The helper is run through a `CommandRunner`,
/// which receives the cancellation token so an in-flight lookup can be
/// killed. A `key` on the request is ignored.
pub struct KeychainProvider {
    config: KeychainConfig,
    runner: Arc<dyn CommandRunner>,
    logger: SharedLogger,
}

impl KeychainProvider {
    /// Create a provider with the default `devopsmaestro` service
    pub fn new() -> Self {
        Self::with_config(KeychainConfig::default())
    }

    /// Create a provider with an explicit configuration
    pub fn with_config(config: KeychainConfig) -> Self {
        Self {
            config,
            runner: Arc::new(SystemCommandRunner::new()),
            logger: NoOpLogger::shared(),
        }
    }

    /// Replace the command runner (tests use a fake)
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &KeychainConfig {
        &self.config
    }

    /// Service namespace for a request, honouring the `service` option
    fn service_for<'a>(&'a self, request: &'a SecretRequest) -> &'a str {
        request.option(SERVICE_OPTION).unwrap_or(self.config.service.as_str())
    }

    fn is_not_found(&self, output: &CommandOutput) -> bool {
        if let Some(code) = output.exit_code {
            if self.config.not_found_exit_codes.contains(&code) {
                return true;
            }
        }
        self.config
            .not_found_phrases
            .iter()
            .any(|phrase| output.stderr.contains(phrase.as_str()))
    }
}

impl Default for KeychainProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeychainProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeychainProvider")
            .field("config", &self.config)
            .finish()
    }
}

impl SecretProvider for KeychainProvider {
    fn name(&self) -> &str {
        "keychain"
    }

    fn is_available(&self) -> bool {
        cfg!(target_os = "macos")
    }

    fn get_secret(&self, cancel: &CancellationToken, request: &SecretRequest) -> SecretResult<String> {
        cancel.check()?;

        let service = self.service_for(request);
        let args = vec![
            "find-generic-password".to_string(),
            "-s".to_string(),
            service.to_string(),
            "-a".to_string(),
            request.name.clone(),
            "-w".to_string(),
        ];

        log_debug!(self.logger, "keychain: looking up '{}' in service '{}'", request.name, service);

        let output = self
            .runner
            .run(cancel, &self.config.program, &args)
            .map_err(|e| match e {
                SecretError::Cancelled => SecretError::Cancelled,
                other => SecretError::provider(
                    self.name(),
                    format!("failed to run {}: {}", self.config.program, other),
                ),
            })?;

        if output.success() {
            let mut value = output.stdout;
            if value.ends_with('\n') {
                value.pop();
                if value.ends_with('\r') {
                    value.pop();
                }
            }
            log_debug!(self.logger, "keychain: found '{}' ({} bytes)", request.name, value.len());
            return Ok(value);
        }

        if self.is_not_found(&output) {
            log_debug!(self.logger, "keychain: '{}' not found in service '{}'", request.name, service);
            return Err(SecretError::not_found(self.name(), &request.name));
        }

        let status = output
            .exit_code
            .map(|code| format!("exit status {}", code))
            .unwrap_or_else(|| "termination by signal".to_string());
        log_warn!(self.logger, "keychain: {} failed for '{}' with {}", self.config.program, request.name, status);
        Err(SecretError::provider(
            self.name(),
            format!("{} failed with {}: {}", self.config.program, status, output.stderr.trim()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ErrorKind;
    use parking_lot::Mutex;

    enum Reply {
        Output(CommandOutput),
        Io,
    }

    struct FakeRunner {
        reply: Reply,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl FakeRunner {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn exit(code: i32, stdout: &str, stderr: &str) -> Arc<Self> {
            Self::new(Reply::Output(CommandOutput {
                exit_code: Some(code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            }))
        }

        fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, cancel: &CancellationToken, program: &str, args: &[String]) -> SecretResult<CommandOutput> {
            cancel.check()?;
            self.calls.lock().push((program.to_string(), args.to_vec()));
            match &self.reply {
                Reply::Output(output) => Ok(output.clone()),
                Reply::Io => Err(SecretError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no such file",
                ))),
            }
        }
    }

    fn provider(runner: Arc<FakeRunner>) -> KeychainProvider {
        KeychainProvider::new().with_runner(runner)
    }

    fn get(provider: &KeychainProvider, request: SecretRequest) -> SecretResult<String> {
        provider.get_secret(&CancellationToken::new(), &request)
    }

    #[test]
    fn test_name_and_availability() {
        let provider = KeychainProvider::new();
        assert_eq!(provider.name(), "keychain");
        assert_eq!(provider.is_available(), cfg!(target_os = "macos"));
        assert_eq!(provider.config().service, DEFAULT_KEYCHAIN_SERVICE);
    }

    #[test]
    fn test_invocation_arguments() {
        let runner = FakeRunner::exit(0, "ghp_test123\n", "");
        let provider = provider(runner.clone());

        let value = get(&provider, SecretRequest::new("github-token")).unwrap();
        assert_eq!(value, "ghp_test123");

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "security");
        assert_eq!(
            calls[0].1,
            vec!["find-generic-password", "-s", "devopsmaestro", "-a", "github-token", "-w"]
        );
    }

    #[test]
    fn test_service_option_override() {
        let runner = FakeRunner::exit(0, "value\n", "");
        let provider = provider(runner.clone());

        let request = SecretRequest::new("token").with_option(SERVICE_OPTION, "other-ns");
        get(&provider, request).unwrap();

        assert_eq!(runner.calls()[0].1[2], "other-ns");
    }

    #[test]
    fn test_configured_service() {
        let runner = FakeRunner::exit(0, "value", "");
        let provider = KeychainProvider::with_config(KeychainConfig::default().with_service("custom"))
            .with_runner(runner.clone());

        assert_eq!(get(&provider, SecretRequest::new("token")).unwrap(), "value");
        assert_eq!(runner.calls()[0].1[2], "custom");
    }

    #[test]
    fn test_only_one_trailing_newline_stripped() {
        let runner = FakeRunner::exit(0, "line\r\n", "");
        assert_eq!(get(&provider(runner), SecretRequest::new("a")).unwrap(), "line");

        let runner = FakeRunner::exit(0, "  spaced \n\n", "");
        assert_eq!(get(&provider(runner), SecretRequest::new("a")).unwrap(), "  spaced \n");
    }

    #[test]
    fn test_not_found_by_exit_code() {
        let runner = FakeRunner::exit(44, "", "");
        let err = get(&provider(runner), SecretRequest::new("missing")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_not_found_by_stderr_phrase() {
        let runner = FakeRunner::exit(
            1,
            "",
            "security: SecKeychainSearchCopyNext: The specified item could not be found in the keychain.",
        );
        let err = get(&provider(runner), SecretRequest::new("missing")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_locked_keychain_is_provider_error() {
        let runner = FakeRunner::exit(
            36,
            "",
            "security: SecKeychainSearchCopyNext: User interaction is not allowed.",
        );
        let err = get(&provider(runner), SecretRequest::new("tok")).unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert!(err.to_string().contains("User interaction is not allowed"));
    }

    #[test]
    fn test_custom_not_found_phrase() {
        let runner = FakeRunner::exit(1, "", "élément introuvable");
        let config = KeychainConfig::default().with_not_found_phrase("introuvable");
        let provider = KeychainProvider::with_config(config).with_runner(runner);

        let err = get(&provider, SecretRequest::new("missing")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_other_failure_is_provider_error_without_stdout() {
        let runner = FakeRunner::exit(51, "leaked-secret-value", "User interaction is not allowed.");
        let err = get(&provider(runner), SecretRequest::new("token")).unwrap_err();

        assert!(!err.is_not_found());
        assert!(matches!(err, SecretError::Provider { .. }));
        let message = err.to_string();
        assert!(message.contains("exit status 51"));
        assert!(message.contains("User interaction is not allowed."));
        assert!(!message.contains("leaked-secret-value"));
    }

    #[test]
    fn test_spawn_failure_is_provider_error() {
        let runner = FakeRunner::new(Reply::Io);
        let err = get(&provider(runner), SecretRequest::new("token")).unwrap_err();
        assert!(matches!(err, SecretError::Provider { .. }));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_cancelled_before_invoking_helper() {
        let runner = FakeRunner::exit(0, "value", "");
        let provider = provider(runner.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = provider.get_secret(&cancel, &SecretRequest::new("token")).unwrap_err();
        assert!(err.is_cancelled());
        assert!(runner.calls().is_empty());
    }
}
