use fixtpool::{
    core::{Axis, ConfigError},
    nn::{FixTPoolingConfig, KernelSpec, PoolMethod, PoolingParameter, PoolingParameterBuilder},
};

fn config(param: PoolingParameter) -> Result<FixTPoolingConfig, ConfigError> {
    FixTPoolingConfig::try_from(&param)
}

#[test]
fn square_kernel_test() {
    for k in 1..=7 {
        let config = config(
            PoolingParameterBuilder::default()
                .fix_time(8)
                .kernel_size(k)
                .build()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(config.kernel(), KernelSpec::Square(k));
        assert_eq!(config.kernel_h(), k);
        assert_eq!(config.kernel_w(), k);
    }
}

#[test]
fn rectangular_kernel_test() {
    let config = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_h(3)
            .kernel_w(5)
            .build()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(config.kernel(), KernelSpec::Rectangular(3, 5));
    assert_eq!((config.kernel_h(), config.kernel_w()), (3, 5));
}

#[test]
fn defaults_test() {
    let config = config(
        PoolingParameterBuilder::default()
            .fix_time(4)
            .kernel_size(2)
            .build()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(config.fix_time(), 4);
    assert_eq!((config.pad_h(), config.pad_w(), config.pad_l()), (0, 0, 0));
    assert_eq!(
        (config.stride_h(), config.stride_w(), config.stride_l()),
        (1, 1, 1)
    );
    assert_eq!(config.pool(), PoolMethod::Max);
}

#[test]
fn missing_fix_time_test() {
    let result = config(
        PoolingParameterBuilder::default()
            .kernel_size(3)
            .build()
            .unwrap(),
    );
    assert_eq!(result, Err(ConfigError::MissingFixTime));
}

#[test]
fn non_positive_fix_time_test() {
    let result = config(
        PoolingParameterBuilder::default()
            .fix_time(0)
            .kernel_size(3)
            .build()
            .unwrap(),
    );
    assert_eq!(result, Err(ConfigError::NonPositiveFixTime(0)));
}

#[test]
fn ambiguous_kernel_test() {
    let result = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_size(3)
            .kernel_h(3)
            .kernel_w(3)
            .build()
            .unwrap(),
    );
    assert_eq!(result, Err(ConfigError::AmbiguousKernel));
}

#[test]
fn missing_kernel_test() {
    let result = config(PoolingParameterBuilder::default().fix_time(8).build().unwrap());
    assert_eq!(result, Err(ConfigError::MissingKernel));

    let result = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_h(3)
            .build()
            .unwrap(),
    );
    assert_eq!(result, Err(ConfigError::MissingKernel));
}

#[test]
fn zero_kernel_test() {
    let result = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_h(3)
            .kernel_w(0)
            .build()
            .unwrap(),
    );
    assert_eq!(
        result,
        Err(ConfigError::NonPositiveKernel {
            axis: Axis::Width,
            kernel: 0
        })
    );
}

#[test]
fn symmetric_pad_expands_to_every_axis_test() {
    let config = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_size(3)
            .pad(1)
            .build()
            .unwrap(),
    )
    .unwrap();
    assert_eq!((config.pad_h(), config.pad_w(), config.pad_l()), (1, 1, 1));
}

#[test]
fn per_axis_pad_test() {
    let config = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_size(3)
            .pad_h(1)
            .pad_w(2)
            .build()
            .unwrap(),
    )
    .unwrap();
    assert_eq!((config.pad_h(), config.pad_w(), config.pad_l()), (1, 2, 0));
}

#[test]
fn ambiguous_pad_test() {
    let both = PoolingParameterBuilder::default()
        .fix_time(8)
        .kernel_size(3)
        .pad(1)
        .pad_h(1)
        .pad_w(1)
        .build()
        .unwrap();
    let half = PoolingParameterBuilder::default()
        .fix_time(8)
        .kernel_size(3)
        .pad_h(1)
        .build()
        .unwrap();
    assert_eq!(config(both), Err(ConfigError::AmbiguousPad));
    assert_eq!(config(half), Err(ConfigError::AmbiguousPad));
}

#[test]
fn stride_test() {
    let symmetric = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_size(3)
            .stride(2)
            .build()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(
        (symmetric.stride_h(), symmetric.stride_w(), symmetric.stride_l()),
        (2, 2, 2)
    );

    let per_axis = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_size(3)
            .stride_h(2)
            .stride_w(3)
            .build()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(
        (per_axis.stride_h(), per_axis.stride_w(), per_axis.stride_l()),
        (2, 3, 1)
    );

    let ambiguous = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_size(3)
            .stride(2)
            .stride_w(2)
            .build()
            .unwrap(),
    );
    assert_eq!(ambiguous, Err(ConfigError::AmbiguousStride));

    let zero = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_size(3)
            .stride(0)
            .build()
            .unwrap(),
    );
    assert_eq!(
        zero,
        Err(ConfigError::NonPositiveStride {
            axis: Axis::Height,
            stride: 0
        })
    );
}

#[test]
fn negative_pad_test() {
    let result = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_size(3)
            .pad(-1)
            .build()
            .unwrap(),
    );
    assert_eq!(
        result,
        Err(ConfigError::NegativePad {
            axis: Axis::Height,
            pad: -1
        })
    );
}

#[test]
fn pad_must_be_smaller_than_kernel_test() {
    let result = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_size(3)
            .pad(3)
            .build()
            .unwrap(),
    );
    assert_eq!(
        result,
        Err(ConfigError::PadExceedsKernel {
            axis: Axis::Height,
            pad: 3,
            kernel: 3
        })
    );

    let result = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_h(5)
            .kernel_w(2)
            .pad_h(1)
            .pad_w(2)
            .build()
            .unwrap(),
    );
    assert_eq!(
        result,
        Err(ConfigError::PadExceedsKernel {
            axis: Axis::Width,
            pad: 2,
            kernel: 2
        })
    );
}

#[test]
fn padding_requires_max_or_average_test() {
    for pool in [PoolMethod::Max, PoolMethod::Ave] {
        let result = config(
            PoolingParameterBuilder::default()
                .fix_time(8)
                .kernel_size(3)
                .pad(1)
                .pool(pool)
                .build()
                .unwrap(),
        );
        assert!(result.is_ok());
    }

    let padded = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_size(3)
            .pad(1)
            .pool(PoolMethod::Stochastic)
            .build()
            .unwrap(),
    );
    assert_eq!(
        padded,
        Err(ConfigError::PaddingUnsupported(PoolMethod::Stochastic))
    );

    let unpadded = config(
        PoolingParameterBuilder::default()
            .fix_time(8)
            .kernel_size(3)
            .pool(PoolMethod::Stochastic)
            .build()
            .unwrap(),
    );
    assert!(unpadded.is_ok());
}

#[test]
fn deserialize_parameter_test() {
    let param: PoolingParameter = serde_json::from_str(
        r#"{ "fix_time": 16, "kernel_h": 3, "kernel_w": 2, "pad": 1, "stride": 2, "pool": "AVE" }"#,
    )
    .unwrap();
    assert_eq!(
        param,
        PoolingParameterBuilder::default()
            .fix_time(16)
            .kernel_h(3)
            .kernel_w(2)
            .pad(1)
            .stride(2)
            .pool(PoolMethod::Ave)
            .build()
            .unwrap()
    );
    let config = config(param).unwrap();
    assert_eq!(config.pool(), PoolMethod::Ave);
    assert_eq!((config.pad_h(), config.pad_w()), (1, 1));
}
