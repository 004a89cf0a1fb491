use super::{ScanOutcome, Scanner, ScannerError};
use crate::number::Number;
use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;

const SEARCH_URL: &str = "https://www.google.com/search";

const SOCIAL_MEDIA: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "instagram.com",
    "vk.com",
];

const DISPOSABLE_PROVIDERS: &[&str] = &[
    "hs3x.com",
    "receive-sms-now.com",
    "smslisten.com",
    "smsnumbersonline.com",
    "freesmscode.com",
    "catchsms.com",
    "smstibo.com",
    "smsreceiving.com",
    "getfreesmsnumber.com",
    "sellaite.com",
    "receive-sms-online.info",
    "receivesmsonline.com",
    "receive-a-sms.com",
    "sms-receive.net",
    "receivefreesms.com",
    "receive-sms.com",
    "receivetxt.com",
    "freephonenum.com",
    "freesmsverification.com",
    "receive-sms-online.com",
    "smslive.co",
];

const REPUTATION: &[&str] = &[
    "whosenumber.info",
    "phonenumber.to",
    "findwhocallsme.com",
    "yellowpages.ca",
    "phonenumberz.com",
    "who-calledme.com",
    "directory.youmail.com",
];

const INDIVIDUALS: &[&str] = &[
    "numinfo.net",
    "sync.me",
    "whocallsyou.de",
    "pastebin.com",
    "whycall.me",
    "locatefamily.com",
    "spytox.com",
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dork {
    pub number: String,
    pub dork: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoogleSearchResult {
    pub social_media: Vec<Dork>,
    pub disposable_providers: Vec<Dork>,
    pub reputation: Vec<Dork>,
    pub individuals: Vec<Dork>,
    pub general: Vec<Dork>,
}

/// Builds Google search dorks for the number; no request is sent.
#[derive(Debug, Default)]
pub struct GoogleSearchScanner;

impl GoogleSearchScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn dorks(&self, number: &Number) -> Result<GoogleSearchResult, ScannerError> {
        let formats = [
            number.international.clone(),
            number.e164.clone(),
            number.raw_local.clone(),
            number.local.clone(),
        ];
        let any_format = formats
            .iter()
            .map(|f| format!("intext:\"{}\"", f))
            .collect::<Vec<_>>()
            .join(" OR ");

        let by_site = |sites: &[&str]| -> Result<Vec<Dork>, ScannerError> {
            sites
                .iter()
                .map(|site| dork(number, format!("site:{} {}", site, any_format)))
                .collect()
        };

        Ok(GoogleSearchResult {
            social_media: by_site(SOCIAL_MEDIA)?,
            disposable_providers: DISPOSABLE_PROVIDERS
                .iter()
                .map(|site| {
                    dork(
                        number,
                        format!(
                            "site:{} intext:\"{}\" OR intext:\"{}\"",
                            site, number.international, number.raw_local
                        ),
                    )
                })
                .collect::<Result<_, _>>()?,
            reputation: by_site(REPUTATION)?,
            individuals: by_site(INDIVIDUALS)?,
            general: vec![
                dork(number, any_format.clone())?,
                dork(
                    number,
                    format!("(ext:doc OR ext:docx OR ext:odt OR ext:pdf OR ext:rtf OR ext:sxw OR ext:psw OR ext:ppt OR ext:pptx OR ext:pps OR ext:csv OR ext:txt OR ext:xls) {}", any_format),
                )?,
            ],
        })
    }
}

fn dork(number: &Number, query: String) -> Result<Dork, ScannerError> {
    let url = Url::parse_with_params(SEARCH_URL, &[("q", query.as_str())])
        .map_err(|e| ScannerError::Failed(e.to_string()))?;

    Ok(Dork {
        number: number.e164.clone(),
        dork: query,
        url: url.to_string(),
    })
}

#[async_trait]
impl Scanner for GoogleSearchScanner {
    fn identifier(&self) -> String {
        "googlesearch".to_string()
    }

    fn should_run(&self) -> bool {
        true
    }

    async fn scan(&self, number: &Number) -> ScanOutcome {
        let result = self.dorks(number)?;
        serde_json::to_value(result)
            .map(Some)
            .map_err(|e| ScannerError::Failed(e.to_string()))
    }
}
