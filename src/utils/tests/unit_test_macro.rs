use crate::errors::AggregationError;
use crate::{assert_err, assert_panic};

#[test]
fn test_assert_panic_macro() {
    assert_panic!(panic!("test panic"));
    assert_panic!(panic!("custom test panic msg"), "custom test panic msg");
}

#[test]
fn test_assert_err_macro() {
    let result: Result<(), AggregationError> = Err(AggregationError::Config("缺少字段".to_string()));
    assert_err!(result);
    assert_err!(result, AggregationError::Config("缺少字段"));
    assert_err!(result, AggregationError::Config(msg) if msg.contains("字段"));

    let result: Result<(), AggregationError> = Err(AggregationError::BatchMismatch {
        input: 2,
        weight: 3,
    });
    assert_err!(result, AggregationError::BatchMismatch { input: 2, .. });
}
