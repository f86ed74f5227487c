#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// LogLevel tests

#[test]
fn LogLevel___ordering___trace_less_than_debug() {
    assert!(LogLevel::Trace < LogLevel::Debug);
}

#[test]
fn LogLevel___ordering___info_less_than_warn() {
    assert!(LogLevel::Info < LogLevel::Warn);
}

#[test]
fn LogLevel___ordering___error_less_than_off() {
    assert!(LogLevel::Error < LogLevel::Off);
}

#[test_case(0, LogLevel::Warn)]
#[test_case(1, LogLevel::Info)]
#[test_case(2, LogLevel::Debug)]
#[test_case(3, LogLevel::Trace)]
#[test_case(9, LogLevel::Trace)]
fn LogLevel___from_verbosity___steps_down_per_flag(count: u8, expected: LogLevel) {
    assert_eq!(LogLevel::from_verbosity(count), expected);
}

#[test]
fn LogLevel___display___shows_uppercase() {
    assert_eq!(LogLevel::Trace.to_string(), "TRACE");
    assert_eq!(LogLevel::Warn.to_string(), "WARN");
    assert_eq!(LogLevel::Off.to_string(), "OFF");
}

// Prelude tests

#[test]
fn prelude___exposes_pool_and_provider() {
    use crate::prelude::*;

    let pool = ClassPool::new();
    let id: ClassId = pool.find_class("java.lang.String").unwrap();

    assert_eq!(pool.class(id).simple_name(), "String");
}
