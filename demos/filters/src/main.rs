use argh::FromArgs;
use std::path::{Path, PathBuf};

use imfilt::{
    image::Image,
    imgproc::{
        color::{self, ChannelWeights, ColorAdjustment},
        filter::{
            self,
            kernels::{self, Kernel, PredefinedKernel},
            AccumulationStrategy, ConvolutionConfig,
        },
        threshold, ImgprocError,
    },
};

const POINT_FILTERS: [&str; 5] = ["color", "brightness", "darkness", "gray", "threshold"];
const KERNEL_FILTERS: [&str; 5] = ["sharpen", "blur", "binomial", "box", "gaussian"];

#[derive(FromArgs)]
/// Apply color, grayscale, threshold and convolution filters to an image
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// directory where the results are written
    #[argh(option, short = 'o', default = "PathBuf::from(\".\")")]
    output_dir: PathBuf,

    /// the filter to apply: all, color, brightness, darkness, gray, threshold,
    /// sharpen, blur, binomial, box or gaussian
    #[argh(option, default = "String::from(\"all\")")]
    filter: String,

    /// red percentage for the color filter
    #[argh(option, default = "0.0")]
    r: f64,

    /// green percentage for the color filter
    #[argh(option, default = "0.0")]
    g: f64,

    /// blue percentage for the color filter
    #[argh(option, default = "0.0")]
    b: f64,

    /// percentage for brightness and darkness
    #[argh(option, default = "20.0")]
    pct: f64,

    /// threshold in [0, 256]
    #[argh(option, default = "127")]
    threshold: u16,

    /// use the plain channel average instead of luminance weights
    #[argh(switch)]
    average: bool,

    /// the kernel size for the box and gaussian filters
    #[argh(option, default = "5")]
    kernel_size: usize,

    /// the sigma for the gaussian filter
    #[argh(option, default = "1.5")]
    sigma: f32,

    /// use the blocked accumulation strategy
    #[argh(switch)]
    blocked: bool,
}

/// Normalize the `--filter` value and reject unknown names.
fn parse_filter(filter: &str) -> Result<String, Box<dyn std::error::Error>> {
    let name = filter.to_lowercase();
    let known = name == "all"
        || POINT_FILTERS.contains(&name.as_str())
        || KERNEL_FILTERS.contains(&name.as_str());
    if !known {
        return Err(format!("Invalid filter: {filter}").into());
    }
    Ok(name)
}

/// Build the kernels selected by `name`, and only those.
fn selected_kernels(
    name: &str,
    kernel_size: usize,
    sigma: f32,
) -> Result<Vec<(&'static str, Kernel)>, ImgprocError> {
    let mut selected = Vec::new();
    for kernel_name in KERNEL_FILTERS {
        if name != "all" && name != kernel_name {
            continue;
        }
        let kernel = match kernel_name {
            "box" => kernels::box_blur(kernel_size)?,
            "gaussian" => kernels::gaussian(kernel_size, sigma)?,
            _ => kernel_name.parse::<PredefinedKernel>()?.kernel(),
        };
        selected.push((kernel_name, kernel));
    }
    Ok(selected)
}

fn read_rgb8(path: &Path) -> Result<Image<u8, 3>, Box<dyn std::error::Error>> {
    let decoded = image::open(path)?.to_rgb8();
    let size = [decoded.width() as usize, decoded.height() as usize].into();
    Ok(Image::new(size, decoded.into_raw())?)
}

fn write_image<const C: usize>(
    dir: &Path,
    name: &str,
    image: &Image<u8, C>,
) -> Result<(), Box<dyn std::error::Error>> {
    let color_type = match C {
        1 => image::ExtendedColorType::L8,
        3 => image::ExtendedColorType::Rgb8,
        _ => return Err(format!("cannot encode {C} channel image").into()),
    };
    let path = dir.join(format!("{name}.png"));
    let [width, height]: [u32; 2] = image.size().into();
    image::save_buffer(&path, image.as_slice(), width, height, color_type)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let name = parse_filter(&args.filter)?;
    let all = name == "all";
    let selected = selected_kernels(&name, args.kernel_size, args.sigma)?;

    let image = read_rgb8(&args.image_path)?;
    log::info!("read {} from {}", image.size(), args.image_path.display());

    std::fs::create_dir_all(&args.output_dir)?;
    let out = args.output_dir.as_path();

    let weights = ChannelWeights::from(!args.average);
    let strategy = if args.blocked {
        AccumulationStrategy::Blocked
    } else {
        AccumulationStrategy::Direct
    };
    let config = ConvolutionConfig::new().with_strategy(strategy);

    if all || name == "color" {
        let adjustment = if all {
            ColorAdjustment::new(20.0, 0.0, 0.0)
        } else {
            ColorAdjustment::new(args.r, args.g, args.b)
        };
        write_image(out, "color", &color::adjust_color(&image, adjustment)?)?;
    }
    if all {
        let green = color::adjust_color(&image, ColorAdjustment::new(0.0, 30.0, 0.0))?;
        write_image(out, "color_green", &green)?;
    }
    if all || name == "brightness" {
        write_image(
            out,
            "brightness",
            &color::brightness(&image, args.pct, weights)?,
        )?;
    }
    if all || name == "darkness" {
        write_image(out, "darkness", &color::darkness(&image, args.pct, weights)?)?;
    }
    if all || name == "gray" {
        let luminance = color::to_grayscale(&image, ChannelWeights::Luminance)?;
        write_image(out, "gray_luminance", &luminance)?;
        let average = color::to_grayscale(&image, ChannelWeights::Uniform)?;
        write_image(out, "gray_average", &average)?;
    }
    if all || name == "threshold" {
        let mask = threshold::threshold_luminance(&image, args.threshold, weights)?;
        write_image(out, "threshold", &mask)?;
    }

    for (kernel_name, kernel) in selected.iter() {
        let filtered = filter::filter2d_with(&image, kernel, &config)?;
        write_image(out, kernel_name, &filtered)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("Sharpen").ok(), Some("sharpen".to_string()));
        assert_eq!(parse_filter("all").ok(), Some("all".to_string()));
        assert!(parse_filter("emboss").is_err());
    }

    #[test]
    fn test_point_filter_builds_no_kernel() -> Result<(), ImgprocError> {
        // an even kernel size is only an error when a sized kernel is requested
        assert!(selected_kernels("gray", 4, 1.5)?.is_empty());
        assert_eq!(selected_kernels("sharpen", 4, 1.5)?.len(), 1);
        assert!(matches!(
            selected_kernels("box", 4, 1.5),
            Err(ImgprocError::InvalidKernel(_))
        ));
        Ok(())
    }

    #[test]
    fn test_all_builds_every_kernel() -> Result<(), ImgprocError> {
        let names: Vec<_> = selected_kernels("all", 5, 1.5)?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, KERNEL_FILTERS);
        Ok(())
    }
}
