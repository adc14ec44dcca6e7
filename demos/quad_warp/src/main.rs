use argh::FromArgs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use quadwarp::geometry::Point2d;
use quadwarp::image::{Image, ImageSize, RasterImage};
use quadwarp::imgproc::warp::WarpOptions;
use quadwarp::{warp_into_quad, PerspectiveRequest, UniformScale};

#[derive(FromArgs)]
/// Warp an image so that its corners land on four target points.
struct Args {
    /// path to the input image
    #[argh(positional)]
    input: PathBuf,

    /// path to the output png
    #[argh(option, short = 'o', default = "PathBuf::from(\"warped.png\")")]
    output: PathBuf,

    /// target corners as x0,y0,x1,y1,x2,y2,x3,y3 in document units
    #[argh(option)]
    corners: String,

    /// width the input is displayed at, in document units (defaults to its pixel width)
    #[argh(option)]
    display_width: Option<f64>,

    /// height the input is displayed at, in document units (defaults to its pixel height)
    #[argh(option)]
    display_height: Option<f64>,

    /// viewport pixels per document unit
    #[argh(option, default = "1.0")]
    scale: f64,

    /// json file with warp options
    #[argh(option)]
    options: Option<PathBuf>,
}

fn parse_corners(text: &str) -> Result<Vec<Point2d>, Box<dyn std::error::Error>> {
    let values = text
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() % 2 != 0 {
        return Err(format!("corners need an even number of values, got {}", values.len()).into());
    }
    Ok(values
        .chunks_exact(2)
        .map(|xy| Point2d::new(xy[0], xy[1]))
        .collect())
}

fn to_raster(img: DynamicImage) -> Result<RasterImage, Box<dyn std::error::Error>> {
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    let raster = match img {
        DynamicImage::ImageLuma8(gray) => RasterImage::Gray(Image::new(size, gray.into_raw())?),
        DynamicImage::ImageLumaA8(gray) => {
            RasterImage::GrayAlpha(Image::new(size, gray.into_raw())?)
        }
        DynamicImage::ImageRgb8(rgb) => RasterImage::Rgb(Image::new(size, rgb.into_raw())?),
        other => RasterImage::Rgba(Image::new(size, other.into_rgba8().into_raw())?),
    };
    Ok(raster)
}

fn save_png(raster: RasterImage, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let [width, height]: [u32; 2] = raster.size().into();
    let encoded = match raster {
        RasterImage::GrayAlpha(img) => {
            image::GrayAlphaImage::from_raw(width, height, img.into_vec()).map(DynamicImage::from)
        }
        RasterImage::Rgba(img) => {
            image::RgbaImage::from_raw(width, height, img.into_vec()).map(DynamicImage::from)
        }
        RasterImage::Indexed(img) => {
            let rgba = img
                .indices()
                .as_slice()
                .iter()
                .flat_map(|&i| {
                    let [r, g, b] = img.palette()[usize::from(i)];
                    let a = if img.transparent() == Some(i) { 0 } else { 255 };
                    [r, g, b, a]
                })
                .collect();
            image::RgbaImage::from_raw(width, height, rgba).map(DynamicImage::from)
        }
        other => return Err(format!("unexpected output format {:?}", other.format()).into()),
    };
    encoded
        .ok_or("output buffer does not match its size")?
        .save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let options = match &args.options {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => WarpOptions::default(),
    };
    log::info!("warp options: {:?}", options);

    let source = to_raster(image::open(&args.input)?)?;
    println!("Source: {} ({:?})", source.size(), source.format());

    let display_width = args.display_width.unwrap_or(source.width() as f64);
    let display_height = args.display_height.unwrap_or(source.height() as f64);
    let corners = parse_corners(&args.corners)?;
    let request =
        PerspectiveRequest::from_control_points(source, display_width, display_height, &corners)?;

    let output = warp_into_quad(&request, &UniformScale::new(args.scale), &options)?;
    println!("Warped: {}", output.size);
    println!(
        "Placement: x={} y={} width={} height={}",
        output.placement.x, output.placement.y, output.placement.width, output.placement.height
    );

    save_png(output.image, &args.output)?;
    println!("Saved to {}", args.output.display());

    Ok(())
}
