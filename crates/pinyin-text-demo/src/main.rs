use std::env;
use std::process::ExitCode;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::Pixel;
use pinyin_text::{AnnotatedItem, Argb, Padding, PinyinTextStyle};
use pinyin_text_embedded_graphics::{EgSurface, EgTextMeasurer};
use pinyin_text_render::{MeasureSpec, PinyinTextView};

const DEMO_PAIRS: &[(&str, &str)] = &[
    ("你", "nǐ"),
    ("在", "zài"),
    ("哪", "nǎ"),
    ("？", " "),
    ("我", "wǒ"),
    ("在", "zài"),
    ("家", "jiā"),
    ("，", " "),
    ("很", "hěn"),
    ("高", "gāo"),
    ("兴", "xìng"),
    ("认", "rèn"),
    ("识", "shi"),
    ("你", "nǐ"),
    ("！", " "),
];
const DEMO_REPEAT: usize = 4;
const PLAIN_TEXT: &str =
    "很高兴认识你！Nice to meet you! 你好吗？How are you? 我很好。I'm fine, thank you.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DemoMode {
    Pinyin,
    Plain,
}

#[derive(Clone, Debug)]
struct Args {
    mode: DemoMode,
    width: u32,
    height: u32,
    exact_height: bool,
    text_size_px: Option<i32>,
    pinyin_size_px: Option<i32>,
    line_spacing_px: Option<i32>,
    item_spacing_px: Option<i32>,
    padding_px: i32,
    debug: bool,
    out_path: String,
    json: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("{}", help_text());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let cfg = parse_args(args)?;
    let mut view = PinyinTextView::with_style(build_style(&cfg)?)
        .with_text_measurer(EgTextMeasurer::shared());
    view.set_padding(Padding::uniform(cfg.padding_px));
    match cfg.mode {
        DemoMode::Pinyin => view.set_annotated_content(demo_items()),
        DemoMode::Plain => view.set_plain_content(PLAIN_TEXT),
    }

    let height_spec = if cfg.exact_height {
        MeasureSpec::exactly(cfg.height as i32)
    } else {
        MeasureSpec::at_most(cfg.height as i32)
    };
    let size = view
        .measure(MeasureSpec::exactly(cfg.width as i32), height_spec)
        .map_err(|e| e.to_string())?;
    log::info!(
        "measured {:?} view at {}x{}px",
        cfg.mode,
        size.width,
        size.height
    );

    if cfg.json {
        let json = match cfg.mode {
            DemoMode::Pinyin => serde_json::to_string_pretty(&view.layout_result()),
            DemoMode::Plain => serde_json::to_string_pretty(&view.plain_layout()),
        }
        .map_err(|e| e.to_string())?;
        println!("{}", json);
    }

    let mut display = RgbDisplay::new(size.width.max(1) as u32, size.height.max(1) as u32);
    let mut surface = EgSurface::new(&mut display);
    surface
        .clear(Argb::WHITE)
        .map_err(|_| "render backend failed".to_string())?;
    view.draw(&mut surface)
        .map_err(|_| "render backend failed".to_string())?;
    display.save_ppm(&cfg.out_path)?;

    println!(
        "rendered {}x{} snapshot to {}",
        size.width, size.height, cfg.out_path
    );
    Ok(())
}

fn demo_items() -> Vec<AnnotatedItem> {
    DEMO_PAIRS
        .iter()
        .cycle()
        .take(DEMO_PAIRS.len() * DEMO_REPEAT)
        .map(|&pair| AnnotatedItem::from(pair))
        .collect()
}

fn build_style(cfg: &Args) -> Result<PinyinTextStyle, String> {
    let mut style = PinyinTextStyle::default().with_debug_draw(cfg.debug);
    if let Some(px) = cfg.text_size_px {
        style.set_text_size(px).map_err(|e| e.to_string())?;
    }
    if let Some(px) = cfg.pinyin_size_px {
        style.set_pinyin_text_size(px).map_err(|e| e.to_string())?;
    }
    if let Some(px) = cfg.line_spacing_px {
        style.line_spacing_px = px;
    }
    if let Some(px) = cfg.item_spacing_px {
        style.item_spacing_px = px;
    }
    Ok(style)
}

fn parse_args(args: Vec<String>) -> Result<Args, String> {
    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h") {
        return Err("help requested".to_string());
    }

    let positional_mode = args.get(1).filter(|v| !v.starts_with("--"));
    let mut cfg = Args {
        mode: match positional_mode.map(String::as_str) {
            None | Some("pinyin") => DemoMode::Pinyin,
            Some("plain") => DemoMode::Plain,
            Some(other) => return Err(format!("unknown mode '{}'", other)),
        },
        width: 360,
        height: 640,
        exact_height: false,
        text_size_px: None,
        pinyin_size_px: None,
        line_spacing_px: None,
        item_spacing_px: None,
        padding_px: 10,
        debug: true,
        out_path: "pinyin-demo.ppm".to_string(),
        json: false,
    };

    let mut i = if positional_mode.is_some() { 2usize } else { 1usize };
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                cfg.width = parse_value(&args, i, "--width")?;
                i += 2;
            }
            "--height" => {
                cfg.height = parse_value(&args, i, "--height")?;
                i += 2;
            }
            "--exact-height" => {
                cfg.exact_height = true;
                i += 1;
            }
            "--text-size" => {
                cfg.text_size_px = Some(parse_value(&args, i, "--text-size")?);
                i += 2;
            }
            "--pinyin-size" => {
                cfg.pinyin_size_px = Some(parse_value(&args, i, "--pinyin-size")?);
                i += 2;
            }
            "--line-spacing" => {
                cfg.line_spacing_px = Some(parse_value(&args, i, "--line-spacing")?);
                i += 2;
            }
            "--item-spacing" => {
                cfg.item_spacing_px = Some(parse_value(&args, i, "--item-spacing")?);
                i += 2;
            }
            "--padding" => {
                cfg.padding_px = parse_value(&args, i, "--padding")?;
                i += 2;
            }
            "--no-debug" => {
                cfg.debug = false;
                i += 1;
            }
            "--out" => {
                let v = args
                    .get(i + 1)
                    .ok_or_else(|| "--out requires a value".to_string())?;
                cfg.out_path = v.clone();
                i += 2;
            }
            "--json" => {
                cfg.json = true;
                i += 1;
            }
            other => return Err(format!("unknown option '{}'", other)),
        }
    }

    if cfg.width == 0 || cfg.height == 0 {
        return Err("--width and --height must be > 0".to_string());
    }
    if cfg.padding_px < 0 {
        return Err("--padding must be >= 0".to_string());
    }
    Ok(cfg)
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    let v = args
        .get(i + 1)
        .ok_or_else(|| format!("{} requires a value", flag))?;
    v.parse::<T>()
        .map_err(|_| format!("invalid {} value '{}'", flag, v))
}

fn help_text() -> &'static str {
    r#"pinyin-demo - render the pinyin text demo screen to a PPM snapshot

USAGE:
  cargo run -p pinyin-text-demo --bin pinyin-demo -- [pinyin|plain] [options]

OPTIONS:
  --width <px>          view width, taken exactly (default: 360)
  --height <px>         maximum view height (default: 640)
  --exact-height        use --height as the exact view height
  --text-size <px>      base text size, at least 2 (default: 14)
  --pinyin-size <px>    annotation size, at least 1 (default: 80% of text size)
  --line-spacing <px>   spacing between lines (default: 5)
  --item-spacing <px>   spacing between items on a line (default: 5)
  --padding <px>        padding on every side (default: 10)
  --no-debug            do not outline item boxes
  --out <path>          output file (default: pinyin-demo.ppm)
  --json                print the computed layout as JSON

Set RUST_LOG=debug to see layout passes.
"#
}

#[derive(Clone, Debug)]
struct RgbDisplay {
    size: Size,
    pixels: Vec<Rgb888>,
}

impl RgbDisplay {
    fn new(width: u32, height: u32) -> Self {
        let len = width.saturating_mul(height) as usize;
        Self {
            size: Size::new(width, height),
            pixels: vec![Rgb888::WHITE; len],
        }
    }

    fn ppm_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixels.len() * 3 + 64);
        data.extend_from_slice(
            format!("P6\n{} {}\n255\n", self.size.width, self.size.height).as_bytes(),
        );
        for color in &self.pixels {
            data.extend_from_slice(&[color.r(), color.g(), color.b()]);
        }
        data
    }

    fn save_ppm(&self, path: &str) -> Result<(), String> {
        std::fs::write(path, self.ppm_bytes()).map_err(|e| e.to_string())
    }
}

impl OriginDimensions for RgbDisplay {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for RgbDisplay {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let w = self.size.width as i32;
        let h = self.size.height as i32;
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x >= w || point.y >= h {
                continue;
            }
            let idx = (point.y as u32 * self.size.width + point.x as u32) as usize;
            self.pixels[idx] = color;
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for pixel in &mut self.pixels {
            *pixel = color;
        }
        Ok(())
    }
}
