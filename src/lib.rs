pub mod error {
    pub mod assertion_error;
    pub mod assertion_error_enums;
}

pub mod logging {
    pub mod buffered_log;
    pub mod syslog;
}

pub mod configuration {
    pub mod load_configuration;
    pub mod run_configuration;
}

pub mod core {
    pub mod command_line_args;
}

pub mod substitution {
    pub mod variable_substitutor;
}

pub mod http {
    pub mod charset;
    pub mod message_framing;
    pub mod request_spec;
    pub mod response_record;
    pub mod transport;
}

pub mod cookies {
    pub mod cookie;
    pub mod cookie_extractor;
}

pub mod golden {
    pub mod golden_resource_loader;
    pub mod resource_path;
}

pub mod assertion {
    pub mod comparator;
    pub mod expectation_set;
    pub mod http_assertion;
    pub mod redirect;
    pub mod verdict;
}

pub mod suite {
    pub mod suite_runner;
    pub mod test_suite;
}
