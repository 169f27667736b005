// Plantey — Info Pages
//
// Stats, tips, and debug pages plus the footer and boot splash.

use embedded_graphics::mono_font::{ascii::FONT_5X8, ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::config::*;
use crate::events::EnvironmentSnapshot;
use crate::ui::pages::PageId;

fn small() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_5X8, BinaryColor::On)
}

fn large() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_6X10, BinaryColor::On)
}

fn heading<D>(target: &mut D, title: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_baseline(title, Point::new(4, 2), large(), Baseline::Top).draw(target)?;
    Line::new(Point::new(0, 14), Point::new(SCREEN_WIDTH as i32 - 1, 14))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)
}

fn line<D>(target: &mut D, x: i32, y: i32, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Text::with_baseline(text, Point::new(x, y), small(), Baseline::Top).draw(target)?;
    Ok(())
}

fn pct(valid: bool, value: f32) -> String {
    if valid && !value.is_nan() {
        format!("{:>3.0}%", value)
    } else {
        " --".to_string()
    }
}

pub fn draw_stats<D>(target: &mut D, env: &EnvironmentSnapshot) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    heading(target, "Env stats")?;
    if env.climate_valid {
        line(target, 4, 18, &format!("Temp : {:4.1}C", env.temperature_c))?;
        line(target, 4, 28, &format!("Hum  : {:4.1}%", env.humidity_pct))?;
    } else {
        line(target, 4, 18, "Temp : --.-C")?;
        line(target, 4, 28, "Hum  : --.-%")?;
    }
    line(target, 4, 40, &format!("Soil :{}", pct(env.soil_valid, env.soil_moisture_pct)))?;
    line(target, 68, 40, &format!("Light:{}", pct(env.light_valid, env.light_pct)))
}

/// Coarse hints shown under the mood tip.
pub fn soil_hint(env: &EnvironmentSnapshot) -> &'static str {
    if !env.soil_valid || env.soil_moisture_pct.is_nan() {
        "Soil sensor offline"
    } else if env.soil_moisture_pct < 30.0 {
        "Soil dry -> water soon"
    } else if env.soil_moisture_pct > 80.0 {
        "Soil wet -> pause water"
    } else {
        "Soil OK -> keep schedule"
    }
}

pub fn light_hint(env: &EnvironmentSnapshot) -> &'static str {
    if !env.light_valid || env.light_pct.is_nan() {
        "Light sensor offline"
    } else if env.light_pct < 20.0 {
        "Needs more light"
    } else if env.light_pct > 90.0 {
        "Shade if leaves scorch"
    } else {
        "Light levels good"
    }
}

pub fn draw_tips<D>(target: &mut D, tip: &str, env: &EnvironmentSnapshot) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    heading(target, "Care tips")?;
    let tip = if tip.is_empty() { "Monitor the plant" } else { tip };
    line(target, 4, 18, tip)?;
    line(target, 4, 30, soil_hint(env))?;
    line(target, 4, 40, light_hint(env))
}

pub fn draw_debug<D>(target: &mut D, env: &EnvironmentSnapshot, ambient: bool) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    heading(target, "Debug raw")?;
    line(target, 4, 18, &format!("Soil raw : {:4}", env.soil_raw))?;
    line(target, 4, 27, &format!("Light raw: {:4}", env.light_raw))?;
    line(target, 4, 36, &format!("Climate  : {}", if env.climate_valid { "valid" } else { "n/a" }))?;
    line(target, 4, 45, &format!("Ambient  : {}", if ambient { "on" } else { "off" }))
}

pub fn draw_footer<D>(target: &mut D, page: PageId, index: usize, count: usize) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let bottom = SCREEN_HEIGHT as i32 - 1;
    Rectangle::new(Point::new(0, bottom), Size::new(SCREEN_WIDTH, 1))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)?;
    Text::with_baseline(page.title(), Point::new(2, bottom - 1), small(), Baseline::Bottom).draw(target)?;

    if count == 0 {
        return Ok(());
    }
    let counter = format!("{}/{}", index.min(count - 1) + 1, count);
    let right = TextStyleBuilder::new()
        .alignment(Alignment::Right)
        .baseline(Baseline::Bottom)
        .build();
    Text::with_text_style(&counter, Point::new(SCREEN_WIDTH as i32 - 2, bottom - 1), small(), right)
        .draw(target)?;
    Ok(())
}

pub fn draw_splash<D>(target: &mut D, line1: &str, line2: Option<&str>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let centered = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    let mid = SCREEN_WIDTH as i32 / 2;
    Text::with_text_style(line1, Point::new(mid, 24), large(), centered).draw(target)?;
    if let Some(text) = line2.filter(|t| !t.is_empty()) {
        Text::with_text_style(text, Point::new(mid, 42), small(), centered).draw(target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::framebuffer::FrameBuffer;

    fn snapshot(soil: f32, light: f32) -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            soil_moisture_pct: soil,
            soil_valid: true,
            light_pct: light,
            light_valid: true,
            ..EnvironmentSnapshot::default()
        }
    }

    #[test]
    fn hints_follow_readings() {
        assert_eq!(soil_hint(&snapshot(10.0, 50.0)), "Soil dry -> water soon");
        assert_eq!(soil_hint(&snapshot(90.0, 50.0)), "Soil wet -> pause water");
        assert_eq!(light_hint(&snapshot(50.0, 5.0)), "Needs more light");
        assert_eq!(light_hint(&EnvironmentSnapshot::default()), "Light sensor offline");
    }

    #[test]
    fn pages_draw_inside_the_screen() {
        let env = snapshot(42.0, 60.0);
        let mut fb = FrameBuffer::new();
        draw_stats(&mut fb, &env).unwrap();
        draw_footer(&mut fb, PageId::Stats, 1, 4).unwrap();
        assert!(fb.lit_pixels() > 100);
        // Footer rule spans the bottom row.
        assert!((0..SCREEN_WIDTH).all(|x| fb.pixel(x, SCREEN_HEIGHT - 1)));
    }

    #[test]
    fn invalid_readings_render_placeholders() {
        assert_eq!(pct(false, 12.0), " --");
        assert_eq!(pct(true, f32::NAN), " --");
        assert_eq!(pct(true, 7.0), "  7%");
    }
}
