use imfilt_image::{Image, ImageSize};
use imfilt_imgproc::{
    color::{self, ChannelWeights, ColorAdjustment},
    filter::{self, kernels, AccumulationStrategy, ConvolutionConfig},
    parallel::ExecutionStrategy,
    threshold, ImgprocError,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_image<const C: usize>(rng: &mut StdRng, width: usize, height: usize) -> Image<u8, C> {
    let data = (0..width * height * C).map(|_| rng.random::<u8>()).collect();
    Image::new(ImageSize { width, height }, data).expect("size matches data")
}

fn random_sizes(rng: &mut StdRng, count: usize) -> Vec<(usize, usize)> {
    (0..count)
        .map(|_| (rng.random_range(1..40), rng.random_range(1..40)))
        .collect()
}

#[test]
fn threshold_output_is_binary() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(7);
    for (w, h) in random_sizes(&mut rng, 20) {
        let image = random_image::<3>(&mut rng, w, h);
        let t = rng.random_range(0..=256u16);
        for weights in [ChannelWeights::Luminance, ChannelWeights::Uniform] {
            let mask = threshold::threshold_luminance(&image, t, weights)?;
            assert_eq!(mask.size(), image.size());
            assert!(mask.as_slice().iter().all(|&v| v == 0 || v == 255));
        }
    }
    Ok(())
}

#[test]
fn grayscale_keeps_size_and_single_channel() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(11);
    for (w, h) in random_sizes(&mut rng, 20) {
        let image = random_image::<3>(&mut rng, w, h);
        for weights in [ChannelWeights::Luminance, ChannelWeights::Uniform] {
            let gray = color::to_grayscale(&image, weights)?;
            assert_eq!(gray.num_channels(), 1);
            assert_eq!(gray.size(), image.size());
            assert_eq!(gray.as_slice().len(), w * h);
        }
    }
    Ok(())
}

#[test]
fn grayscale_average_is_idempotent() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(13);
    let gray = random_image::<1>(&mut rng, 17, 9);

    let mut rgb = Image::<u8, 3>::from_size_val(gray.size(), 0)?;
    color::rgb_from_gray(&gray, &mut rgb)?;

    assert_eq!(color::to_grayscale(&rgb, ChannelWeights::Uniform)?, gray);
    assert_eq!(color::to_grayscale(&gray, ChannelWeights::Uniform)?, gray);
    Ok(())
}

#[test]
fn identity_kernel_reproduces_image() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(17);
    let image = random_image::<3>(&mut rng, 31, 23);
    for size in [1, 3, 5, 9, 21] {
        let kernel = kernels::identity(size)?;
        for strategy in [AccumulationStrategy::Direct, AccumulationStrategy::Blocked] {
            let config = ConvolutionConfig::new().with_strategy(strategy);
            assert_eq!(filter::filter2d_with(&image, &kernel, &config)?, image);
        }
    }
    Ok(())
}

#[test]
fn uniform_blur_preserves_constant_image() -> Result<(), ImgprocError> {
    for v in [0u8, 1, 77, 128, 254, 255] {
        let image = Image::<u8, 3>::from_size_val([40, 36].into(), v)?;
        for size in [3, 5, 11, 33] {
            assert_eq!(filter::box_blur(&image, size)?, image);
        }
        assert_eq!(filter::binomial_blur(&image)?, image);
    }
    Ok(())
}

#[test]
fn large_kernel_on_constant_image() -> Result<(), ImgprocError> {
    let image = Image::<u8, 1>::from_size_val([103, 103].into(), 200)?;
    let kernel = kernels::box_blur(101)?;
    let config = ConvolutionConfig::new().with_strategy(AccumulationStrategy::Blocked);
    assert_eq!(filter::filter2d_with(&image, &kernel, &config)?, image);
    Ok(())
}

#[test]
fn accumulation_strategies_are_identical() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(19);
    for (w, h) in [(32, 24), (50, 41)] {
        let image = random_image::<3>(&mut rng, w, h);
        for kernel in [
            kernels::edge_enhance_3x3(),
            kernels::binomial_blur_5x5(),
            kernels::box_blur(9)?,
            kernels::gaussian(11, 2.5)?,
        ] {
            let direct = filter::filter2d_with(
                &image,
                &kernel,
                &ConvolutionConfig::new()
                    .with_strategy(AccumulationStrategy::Direct)
                    .with_execution(ExecutionStrategy::Serial),
            )?;
            let blocked = filter::filter2d_with(
                &image,
                &kernel,
                &ConvolutionConfig::new().with_strategy(AccumulationStrategy::Blocked),
            )?;
            assert_eq!(direct, blocked);
        }
    }
    Ok(())
}

#[test]
fn convolution_does_not_touch_input() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(23);
    let image = random_image::<3>(&mut rng, 16, 16);
    let copy = image.clone();
    let _ = filter::sharpen(&image)?;
    assert_eq!(image, copy);
    Ok(())
}

#[test]
fn brightness_zero_is_noop() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(29);
    let image = random_image::<3>(&mut rng, 12, 8);
    for weights in [ChannelWeights::Luminance, ChannelWeights::Uniform] {
        assert_eq!(color::brightness(&image, 0.0, weights)?, image);
    }
    Ok(())
}

#[test]
fn out_of_range_arguments_are_rejected() -> Result<(), ImgprocError> {
    let mut rng = StdRng::seed_from_u64(31);
    let image = random_image::<3>(&mut rng, 4, 4);

    let res = color::darkness(&image, 150.0, ChannelWeights::Luminance);
    assert!(matches!(res, Err(ImgprocError::InvalidArgument(_))));

    let res = threshold::threshold_luminance(&image, 300, ChannelWeights::Luminance);
    assert!(matches!(res, Err(ImgprocError::InvalidArgument(_))));

    let res = color::brightness(&image, -10.0, ChannelWeights::Uniform);
    assert!(matches!(res, Err(ImgprocError::InvalidArgument(_))));
    Ok(())
}

#[test]
fn color_filter_scenario() -> Result<(), ImgprocError> {
    let mut image = Image::<u8, 3>::new(
        [2, 2].into(),
        vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120],
    )?;

    color::adjust_color_inplace(&mut image, ColorAdjustment::new(100.0, 0.0, 0.0))?;

    assert_eq!(image.pixel(0, 0), &[20, 20, 30]);
    assert_eq!(
        image.as_slice(),
        &[20, 20, 30, 80, 50, 60, 140, 80, 90, 200, 110, 120]
    );
    Ok(())
}
