// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const TOKEN: &str = "123456:ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghi";

#[yare::parameterized(
    valid = { TOKEN, true },
    valid_dashes = { "1:abcdefghij-_abcdefghij-_abcdefghij-", true },
    empty = { "", false },
    no_colon = { "123456ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghi", false },
    short_secret = { "123456:ABC", false },
    long_secret = { "123456:ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghij", false },
    non_numeric_id = { "abc:ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghi", false },
    bad_char = { "123456:ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefgh!", false },
)]
fn token_shape(token: &str, valid: bool) {
    assert_eq!(validate_token(token), valid);
}

#[test]
fn mask_token_short_returns_all_star() {
    assert_eq!(mask_token(""), "***");
    assert_eq!(mask_token("123:abc"), "***");
    assert_eq!(mask_token("12345678901"), "***");
}

#[test]
fn mask_token_long_shows_head_and_tail() {
    assert_eq!(mask_token(TOKEN), "123456:***fghi");
    assert_eq!(mask_token("123456789012"), "1234567***9012");
}

#[test]
fn new_rejects_bad_token_before_network() {
    let err = ApiClient::new(DEFAULT_URL, "nope", Duration::from_secs(1));
    assert!(matches!(err, Err(BotError::InvalidToken)));
}

#[yare::parameterized(
    not_a_url = { "not a url" },
    ftp = { "ftp://example.com" },
)]
fn new_rejects_bad_url(url: &str) {
    let err = ApiClient::new(url, TOKEN, Duration::from_secs(1));
    assert!(matches!(err, Err(BotError::InvalidUrl { .. })));
}

#[test]
fn urls_mask_the_token() -> anyhow::Result<()> {
    let client = ApiClient::new("http://localhost:8081/", TOKEN, Duration::from_secs(1))?;
    assert_eq!(client.url("getMe"), format!("http://localhost:8081/bot{TOKEN}/getMe"));
    assert_eq!(client.masked_url("getMe"), "http://localhost:8081/bot123456:***fghi/getMe");
    assert!(!format!("{client:?}").contains(TOKEN));
    Ok(())
}

const DEFAULT_URL: &str = crate::config::DEFAULT_API_URL;
