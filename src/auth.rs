//! Popup sign-in boundary.
//!
//! The identity provider is external: this module only drives the flow. A
//! [`SignInProvider`] opens the popup and yields a [`Credential`]; the
//! credential's identity token is handed to the server by navigating to the
//! callback path. Failures are logged and swallowed, leaving the user on the
//! current page.

use std::future::Future;

/// Failure of the popup flow or of token retrieval.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("sign-in popup failed: {0}")]
    Popup(String),
    #[error("could not obtain identity token: {0}")]
    Token(String),
}

/// Credential returned by a successful popup sign-in.
pub trait Credential {
    /// Fetches the identity token for the signed-in user.
    fn id_token(&self) -> impl Future<Output = Result<String, AuthError>>;
}

/// Runs the provider's popup sign-in flow.
pub trait SignInProvider {
    type Credential: Credential;

    fn sign_in_with_popup(&self) -> impl Future<Output = Result<Self::Credential, AuthError>>;
}

/// Performs a full-page navigation.
pub trait Navigator {
    fn navigate(&mut self, url: &str);
}

/// Builds `<callback_path>?id_token=<token>` with the token percent-encoded.
pub fn callback_url(callback_path: &str, id_token: &str) -> String {
    format!("{callback_path}?id_token={}", urlencoding::encode(id_token))
}

async fn fetch_token<P: SignInProvider>(provider: &P) -> Result<String, AuthError> {
    let credential = provider.sign_in_with_popup().await?;
    let token = credential.id_token().await?;
    if token.is_empty() {
        return Err(AuthError::Token("provider returned an empty token".into()));
    }
    Ok(token)
}

/// Signs in through the popup and navigates to the callback with the token.
///
/// Returns the URL navigated to, or `None` if sign-in failed. Failures are
/// logged at error level; there is no retry.
pub async fn sign_in<P, N>(provider: &P, navigator: &mut N, callback_path: &str) -> Option<String>
where
    P: SignInProvider,
    N: Navigator,
{
    match fetch_token(provider).await {
        Ok(token) => {
            let url = callback_url(callback_path, &token);
            tracing::debug!("sign-in succeeded, handing token to callback");
            navigator.navigate(&url);
            Some(url)
        }
        Err(err) => {
            tracing::error!(%err, "error during authentication");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    struct FakeCredential(Result<String, String>);

    impl Credential for FakeCredential {
        async fn id_token(&self) -> Result<String, AuthError> {
            self.0.clone().map_err(AuthError::Token)
        }
    }

    struct FakeProvider(Result<&'static str, &'static str>);

    impl SignInProvider for FakeProvider {
        type Credential = FakeCredential;

        async fn sign_in_with_popup(&self) -> Result<FakeCredential, AuthError> {
            match self.0 {
                Ok(token) => Ok(FakeCredential(Ok(token.to_string()))),
                Err(msg) => Err(AuthError::Popup(msg.to_string())),
            }
        }
    }

    struct BadTokenProvider;

    impl SignInProvider for BadTokenProvider {
        type Credential = FakeCredential;

        async fn sign_in_with_popup(&self) -> Result<FakeCredential, AuthError> {
            Ok(FakeCredential(Err("revoked".into())))
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        visited: Vec<String>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&mut self, url: &str) {
            self.visited.push(url.to_string());
        }
    }

    #[test]
    fn test_callback_url() {
        assert_eq!(
            callback_url("/auth/callback", "eyJhbGciOi.eyJzdWIi.sig"),
            "/auth/callback?id_token=eyJhbGciOi.eyJzdWIi.sig"
        );
        assert_eq!(
            callback_url("/auth/callback", "a+b/c="),
            "/auth/callback?id_token=a%2Bb%2Fc%3D"
        );
    }

    #[test]
    fn test_sign_in_success_navigates() {
        let mut nav = RecordingNavigator::default();
        let url = block_on(sign_in(&FakeProvider(Ok("tok123")), &mut nav, "/auth/callback"));
        assert_eq!(url.as_deref(), Some("/auth/callback?id_token=tok123"));
        assert_eq!(nav.visited, vec!["/auth/callback?id_token=tok123"]);
    }

    #[test]
    fn test_popup_failure_stays_put() {
        let mut nav = RecordingNavigator::default();
        let url = block_on(sign_in(
            &FakeProvider(Err("popup closed by user")),
            &mut nav,
            "/auth/callback",
        ));
        assert_eq!(url, None);
        assert!(nav.visited.is_empty());
    }

    #[test]
    fn test_token_failure_stays_put() {
        let mut nav = RecordingNavigator::default();
        assert_eq!(block_on(sign_in(&BadTokenProvider, &mut nav, "/cb")), None);
        assert!(nav.visited.is_empty());
    }

    #[test]
    fn test_empty_token_is_failure() {
        let mut nav = RecordingNavigator::default();
        assert_eq!(block_on(sign_in(&FakeProvider(Ok("")), &mut nav, "/cb")), None);
        assert!(nav.visited.is_empty());
    }

    #[test]
    fn test_auth_error_display() {
        assert_eq!(
            AuthError::Popup("blocked".into()).to_string(),
            "sign-in popup failed: blocked"
        );
    }
}
