/// A `&'static Regex` compiled on first use. Only for literal patterns.
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).expect("literal regex is valid"));
        &*RE
    }};
}
