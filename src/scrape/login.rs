// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Login page extraction: token, welcome banner, captcha

use regex::Regex;

use super::parse_document;
use crate::error::Result;
use crate::site::SiteProfile;

/// Captcha presented when the site distrusts a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptchaChallenge {
    /// Challenge id, resubmitted together with the answer
    pub id: String,
    /// Image URL to put in front of a human
    pub url: String,
}

/// Anti-automation token from the login page's inline script
///
/// The real page assigns the token into the form from a script; submitting
/// the form without it is rejected as non-browser traffic. The token is
/// per-session and single-use.
pub fn session_token(body: &str, profile: &SiteProfile) -> Option<String> {
    profile
        .token_pattern
        .captures(body)
        .map(|caps| caps[1].to_string())
}

/// Check whether a page greets exactly this user
///
/// The welcome banner wraps the username in markup, so the check matches
/// prefix, literal username and suffix with arbitrary text between them.
pub fn confirms_login(body: &str, user: &str, profile: &SiteProfile) -> bool {
    let pattern = format!(
        "{}.+{}.+{}",
        regex::escape(&profile.welcome_prefix),
        regex::escape(user),
        regex::escape(&profile.welcome_suffix)
    );
    // Built from escaped literals only, cannot fail to compile.
    Regex::new(&pattern).unwrap().is_match(body)
}

/// Captcha id from a login response page, None when no captcha is shown
pub fn captcha_id(body: &str, profile: &SiteProfile) -> Result<Option<String>> {
    let document = parse_document(body)?;
    Ok(document
        .select(&profile.captcha_selector)
        .next()
        .and_then(|el| el.value().attr("value"))
        .map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const LOGIN_FORM_PAGE: &str = r#"<html><head><script>
        (function() {
            document.getElementsByName(".albatross")[0].value = "a1b2c3d4";
        })();
    </script></head><body>
        <form method="post"><input type="hidden" name=".albatross" value=""></form>
    </body></html>"#;

    const WELCOME_PAGE: &str = r#"<html><body>
        <div class="header">ようこそ、<strong>alice</strong> さん</div>
    </body></html>"#;

    #[test]
    fn test_session_token_extracted() {
        let profile = SiteProfile::new();
        assert_eq!(
            session_token(LOGIN_FORM_PAGE, &profile).as_deref(),
            Some("a1b2c3d4")
        );
    }

    #[test]
    fn test_session_token_missing() {
        let profile = SiteProfile::new();
        assert!(session_token("<html><body>plain</body></html>", &profile).is_none());
    }

    #[test]
    fn test_confirms_login_for_named_user_only() {
        let profile = SiteProfile::new();
        assert!(confirms_login(WELCOME_PAGE, "alice", &profile));
        assert!(!confirms_login(WELCOME_PAGE, "bob", &profile));
    }

    #[test]
    fn test_username_matched_literally() {
        let profile = SiteProfile::new();
        let body = "<html><body>ようこそ、<b>dotXuser</b> さん</body></html>";
        // An unescaped "." would match any character here.
        assert!(!confirms_login(body, "dot.user", &profile));
    }

    #[test]
    fn test_captcha_id_present() {
        let profile = SiteProfile::new();
        let body = r#"<html><body>
            <form method="post">
                <input type="hidden" id="captchaId" name="captchaId" value="CAP123">
            </form>
        </body></html>"#;
        assert_eq!(
            captcha_id(body, &profile).unwrap().as_deref(),
            Some("CAP123")
        );
    }

    #[test]
    fn test_captcha_id_absent() {
        let profile = SiteProfile::new();
        let body = "<html><body>no challenge</body></html>";
        assert!(captcha_id(body, &profile).unwrap().is_none());
    }

    #[test]
    fn test_captcha_id_on_empty_body_fails() {
        let profile = SiteProfile::new();
        assert!(matches!(captcha_id("", &profile), Err(Error::EmptyDocument)));
    }
}
