//! Digest rendering: subject line, HTML body, plain-text alternative.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::Digest;

pub const EMPTY_MESSAGE: &str = "No fresh jobs found in this run.";

pub fn subject(digest: &Digest) -> String {
    format!("{} ({} new)", digest.subject, digest.len())
}

pub fn html(digest: &Digest) -> String {
    if digest.is_empty() {
        return format!("<p>{}</p>", encode_text(EMPTY_MESSAGE));
    }

    let mut out = String::new();
    for (i, l) in digest.listings.iter().enumerate() {
        let posted = l.posted_time.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "<h3>{}. {}</h3>\n\
             <p><strong>Company:</strong> {}</p>\n\
             <p><strong>Location:</strong> {}</p>\n\
             <p><strong>Posted:</strong> {}</p>\n\
             <p><a href=\"{}\" target=\"_blank\">Apply Here</a></p>\n\
             <hr />\n",
            i + 1,
            encode_text(&l.title),
            encode_text(&l.company),
            encode_text(&l.location),
            encode_text(posted),
            encode_double_quoted_attribute(&l.link),
        ));
    }
    out
}

pub fn text(digest: &Digest) -> String {
    if digest.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }

    let mut out = String::new();
    for (i, l) in digest.listings.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}\n   Company: {}\n   Location: {}\n   Posted: {}\n   {}\n\n",
            i + 1,
            l.title,
            l.company,
            l.location,
            l.posted_time.as_deref().unwrap_or("-"),
            l.link
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::RawListing;
    use chrono::{TimeZone, Utc};

    fn digest(listings: Vec<RawListing>) -> Digest {
        let now = Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap();
        Digest::new(listings, "Jobs", now)
    }

    #[test]
    fn html_escapes_fields() {
        let d = digest(vec![RawListing {
            title: "C++ <Dev>".into(),
            company: "A&B".into(),
            link: "https://x.test/?a=1&b=\"2\"".into(),
            posted_time: Some("1 hour ago".into()),
            ..Default::default()
        }]);
        let h = html(&d);
        assert!(h.contains("<h3>1. C++ &lt;Dev&gt;</h3>"));
        assert!(h.contains("A&amp;B"));
        assert!(h.contains("&quot;2&quot;"));
        assert!(h.contains("Apply Here"));
    }

    #[test]
    fn empty_digest_has_message() {
        let d = digest(vec![]);
        assert!(html(&d).contains(EMPTY_MESSAGE));
        assert!(text(&d).contains(EMPTY_MESSAGE));
        assert_eq!(subject(&d), "Jobs (0 new)");
    }
}
