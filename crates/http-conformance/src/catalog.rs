//! The fixed catalog of request scenarios
//!
//! Each case is replayed verbatim against both servers. Adding a scenario
//! means adding an entry here.

/// One fully specified HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl TestCase {
    pub fn new(name: &str, method: &str, path: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            method: method.to_string(),
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(name: &str, path: impl Into<String>) -> Self {
        Self::new(name, "GET", path)
    }

    pub fn post(name: &str, path: impl Into<String>) -> Self {
        Self::new(name, "POST", path)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// The scenarios run on every invocation, in order.
pub fn default_catalog() -> Vec<TestCase> {
    vec![
        TestCase::get("test_root", "/"),
        TestCase::get("test_index", "/index.html"),
        TestCase::get("test_about", "/about.html"),
        TestCase::get("test_upload", "/upload.html"),
        TestCase::get("test_delete", "/delete.html"),
        TestCase::get("test_calculator", "/calculator.html"),
        TestCase::get("test_not_exist", "/does-not-exist"),
        TestCase::get("test_hello_cgi", "/cgi-bin/hello.py"),
        TestCase::get(
            "test_gravity_cgi",
            "/cgi-bin/weight_convert.py?weight=100&planet=mars",
        ),
        TestCase::post("test_empty_body", "/"),
        TestCase::post("test_gravity_cgi_post", "/cgi-bin/weight_convert.py")
            .with_header("Content-Type", FORM_URLENCODED)
            .with_body("weight=100&planet=mars"),
        TestCase::post("test_large_post", "/cgi-bin/hello.py")
            .with_header("Content-Type", FORM_URLENCODED)
            .with_body(format!("data={}", "A".repeat(8000))),
        TestCase::get("test_triple_slash", "///index.html"),
        TestCase::get("test_url_decoding", "/my%20file.html"),
        TestCase::get("test_traversal", "/../../etc/passwd"),
        TestCase::new("test_lowercase_method", "get", "/"),
    ]
}

/// A scenario excluded from the default run because it takes one server down
#[derive(Debug, Clone)]
pub struct KnownCrasher {
    pub case: TestCase,
    /// Which server the scenario is known to break
    pub breaks: &'static str,
}

/// Scenarios left out of the default catalog.
pub fn known_crashers() -> Vec<KnownCrasher> {
    vec![
        KnownCrasher {
            case: TestCase::get("test_max_url_fail", format!("/{}", "x".repeat(10_000))),
            breaks: "candidate",
        },
        KnownCrasher {
            case: TestCase::get("test_never_cgi", "/cgi-bin/never.py"),
            breaks: "reference",
        },
    ]
}
