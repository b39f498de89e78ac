use serde::Deserialize;

/// Text and creation time of one tweet. Always produced as a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetFields {
    pub text: String,
    pub created_at: String,
}

// Path: data.tweetResult.result.legacy.{full_text, created_at}
// Every step is optional so a missing key is a `None`, not a parse error.

#[derive(Debug, Deserialize)]
struct TweetResultPayload {
    data: Option<TweetResultData>,
}

#[derive(Debug, Deserialize)]
struct TweetResultData {
    #[serde(rename = "tweetResult")]
    tweet_result: Option<TweetResultWrapper>,
}

#[derive(Debug, Deserialize)]
struct TweetResultWrapper {
    result: Option<TweetResult>,
}

#[derive(Debug, Deserialize)]
struct TweetResult {
    legacy: Option<TweetLegacy>,
}

#[derive(Debug, Deserialize)]
struct TweetLegacy {
    full_text: Option<String>,
    created_at: Option<String>,
}

impl TweetLegacy {
    fn into_fields(self) -> Option<TweetFields> {
        Some(TweetFields {
            text: self.full_text?,
            created_at: self.created_at?,
        })
    }
}

/// Pull the tweet text and timestamp out of a `TweetResultByRestId` response
/// body. Malformed JSON is an error; a well-formed body without the fields
/// is `Ok(None)`.
pub fn tweet_fields(body: &str) -> Result<Option<TweetFields>, serde_json::Error> {
    let payload: TweetResultPayload = serde_json::from_str(body)?;
    Ok(payload
        .data
        .and_then(|d| d.tweet_result)
        .and_then(|t| t.result)
        .and_then(|r| r.legacy)
        .and_then(TweetLegacy::into_fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_and_timestamp() {
        let body = r#"{"data":{"tweetResult":{"result":{"legacy":{"full_text":"hello","created_at":"t1"}}}}}"#;
        assert_eq!(
            tweet_fields(body).unwrap(),
            Some(TweetFields {
                text: "hello".into(),
                created_at: "t1".into(),
            })
        );
    }

    #[test]
    fn ignores_unrelated_keys() {
        let body = r#"{"data":{"tweetResult":{"result":{
            "__typename":"Tweet","rest_id":"1",
            "legacy":{"full_text":"hi","created_at":"Wed Oct 10 20:19:24 +0000 2018","favorite_count":3}
        }}}}"#;
        let fields = tweet_fields(body).unwrap().unwrap();
        assert_eq!(fields.text, "hi");
        assert_eq!(fields.created_at, "Wed Oct 10 20:19:24 +0000 2018");
    }

    #[test]
    fn missing_path_is_none() {
        for body in [
            r#"{}"#,
            r#"{"data":null}"#,
            r#"{"data":{"tweetResult":{}}}"#,
            r#"{"data":{"tweetResult":{"result":{"__typename":"TweetUnavailable"}}}}"#,
        ] {
            assert_eq!(tweet_fields(body).unwrap(), None, "body: {body}");
        }
    }

    #[test]
    fn one_leaf_missing_yields_neither() {
        let body = r#"{"data":{"tweetResult":{"result":{"legacy":{"full_text":"only text"}}}}}"#;
        assert_eq!(tweet_fields(body).unwrap(), None);
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(tweet_fields("{not json").is_err());
    }
}
