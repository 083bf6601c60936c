//! Functions for carrying the session state between requests with private
//! cookies.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{
    Duration, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
    Error,
    auth::session::{Identity, Session},
};

pub(crate) const COOKIE_IDENTITY: &str = "identity";
pub(crate) const COOKIE_EXPIRY: &str = "expiry";

/// The default duration for which session cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(30);

/// Date time format for the expiry cookie, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
         sign:mandatory]:[offset_minute]:[offset_second]"
);

/// Store `session` in the cookie jar.
///
/// An authenticated session sets the identity and expiry cookie pair with an
/// expiry of `duration` from the current time; an anonymous session expires
/// both cookies (see [invalidate_session_cookies]).
///
/// Returns the cookie jar with the cookies added.
///
/// # Errors
///
/// Returns [Error::InvalidDateFormat] if the expiry time cannot be
/// formatted.
pub fn write_session(
    jar: PrivateCookieJar,
    session: &Session,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let identity = match session.current() {
        Some(identity) => identity,
        None => return Ok(invalidate_session_cookies(jar)),
    };

    let expiry = OffsetDateTime::now_utc() + duration;
    // Use format instead of to_string to avoid errors at midnight when the
    // hour is printed as a single digit when [DATE_TIME_FORMAT] expects two
    // digits.
    let expiry_string = expiry
        .format(DATE_TIME_FORMAT)
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), expiry.to_string()))?;

    Ok(jar
        .add(
            Cookie::build((COOKIE_IDENTITY, identity.as_str().to_owned()))
                .expires(expiry)
                .http_only(true)
                .same_site(SameSite::Strict)
                .secure(true),
        )
        .add(
            Cookie::build((COOKIE_EXPIRY, expiry_string))
                .expires(expiry)
                .http_only(true)
                .same_site(SameSite::Strict)
                .secure(true),
        ))
}

/// Reconstruct the session stored in the cookie jar.
///
/// Returns an anonymous session when either cookie is missing, the expiry
/// cookie cannot be parsed, or the stored expiry has passed. Ledger and
/// report routes treat all three cases the same way: no authenticated
/// session, no data access.
pub fn read_session(jar: &PrivateCookieJar) -> Session {
    let identity_cookie = match jar.get(COOKIE_IDENTITY) {
        Some(cookie) => cookie,
        None => return Session::anonymous(),
    };

    let expiry = match jar.get(COOKIE_EXPIRY).as_ref().map(extract_date_time) {
        Some(Ok(expiry)) => expiry,
        _ => return Session::anonymous(),
    };

    if expiry <= OffsetDateTime::now_utc() {
        return Session::anonymous();
    }

    Session::authenticated(Identity::new(identity_cookie.value_trimmed()))
}

/// Set the session cookies to an invalid value and set their max age to
/// zero, which should delete the cookies on the client side.
pub fn invalidate_session_cookies(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_IDENTITY, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
    .add(
        Cookie::build((COOKIE_EXPIRY, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Set the expiry of the session cookies in `jar` to the latest of UTC now
/// plus `duration` and the cookies' current expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns:
/// - [Error::CookieMissing] if the identity or expiry cookie are not in the
///   cookie jar.
/// - [Error::InvalidDateFormat] if the stored expiry cannot be parsed, if
///   extending by `duration` would overflow the date time, or if the new
///   expiry cannot be formatted.
pub(crate) fn extend_session_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expiry_cookie = jar.get(COOKIE_EXPIRY).ok_or(Error::CookieMissing)?;
    let current_expiry = extract_date_time(&expiry_cookie).map_err(|error| {
        Error::InvalidDateFormat(error.to_string(), expiry_cookie.value_trimmed().to_owned())
    })?;

    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::InvalidDateFormat("date time overflow".to_owned(), String::new()))?;

    let expiry = max(current_expiry, new_expiry);

    set_session_cookie_expiry(jar, expiry)
}

/// Sets the expiry of the session cookie pair in `jar` to `expiry`.
///
/// The cookies are rebuilt from scratch rather than mutated: cookies parsed
/// from a request carry only name and value, so re-adding them directly
/// would silently drop the HttpOnly/SameSite/Secure attributes.
fn set_session_cookie_expiry(
    jar: PrivateCookieJar,
    expiry: OffsetDateTime,
) -> Result<PrivateCookieJar, Error> {
    let expiry_string = expiry
        .format(DATE_TIME_FORMAT)
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), expiry.to_string()))?;

    let identity = jar
        .get(COOKIE_IDENTITY)
        .ok_or(Error::CookieMissing)?
        .value_trimmed()
        .to_owned();

    Ok(jar
        .add(
            Cookie::build((COOKIE_IDENTITY, identity))
                .expires(expiry)
                .http_only(true)
                .same_site(SameSite::Strict)
                .secure(true),
        )
        .add(
            Cookie::build((COOKIE_EXPIRY, expiry_string))
                .expires(expiry)
                .http_only(true)
                .same_site(SameSite::Strict)
                .secure(true),
        ))
}

fn extract_date_time(cookie: &Cookie) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(cookie.value_trimmed(), DATE_TIME_FORMAT)
}
