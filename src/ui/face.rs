// Plantey — Face Renderer
//
// Draws the animated face from a `FaceExpression`.  Pure drawing: no state,
// no timing.  Works on any 1-bpp `DrawTarget`.

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Arc, Circle, Ellipse, Line, PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::{Baseline, Text};

use crate::config::INTERACTION_PULSE_VISIBLE_MS;
use crate::mood::FaceExpression;

const CENTER_X: i32 = 64;
const EYE_Y: i32 = 28;
const EYE_OFFSET_X: i32 = 20;
const EYE_DIAMETER: u32 = 15;
const MOUTH_Y: i32 = 46;

fn on() -> PrimitiveStyle<BinaryColor> {
    PrimitiveStyle::with_fill(BinaryColor::On)
}

fn off() -> PrimitiveStyle<BinaryColor> {
    PrimitiveStyle::with_fill(BinaryColor::Off)
}

fn stroke(width: u32) -> PrimitiveStyle<BinaryColor> {
    PrimitiveStyle::with_stroke(BinaryColor::On, width)
}

pub fn draw_face<D>(target: &mut D, face: &FaceExpression, title: &str, blink: bool) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let label = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Text::with_baseline(title, Point::new(2, 0), label, Baseline::Top).draw(target)?;

    let left = Point::new(CENTER_X - EYE_OFFSET_X, EYE_Y);
    let right = Point::new(CENTER_X + EYE_OFFSET_X, EYE_Y);
    draw_eye(target, left, face, blink || face.wink_left)?;
    draw_eye(target, right, face, blink || face.wink_right)?;
    draw_mouth(target, face)?;

    if face.blush {
        for eye in [left, right] {
            let y = eye.y + 11;
            Line::new(Point::new(eye.x - 7, y), Point::new(eye.x - 3, y - 1))
                .into_styled(stroke(1))
                .draw(target)?;
            Line::new(Point::new(eye.x + 3, y - 1), Point::new(eye.x + 7, y))
                .into_styled(stroke(1))
                .draw(target)?;
        }
    }

    if face.tear {
        let top = Point::new(left.x - 6, left.y + 9);
        Triangle::new(top, top + Point::new(-3, 6), top + Point::new(3, 6))
            .into_styled(on())
            .draw(target)?;
        Circle::with_center(top + Point::new(0, 7), 6).into_styled(on()).draw(target)?;
    }

    if face.sweat {
        let tip = Point::new(right.x + 12, right.y - 12);
        Triangle::new(tip, tip + Point::new(-3, 5), tip + Point::new(3, 5))
            .into_styled(stroke(1))
            .draw(target)?;
    }

    if face.heart {
        draw_heart(target, Point::new(112, 8))?;
    }

    if face.interaction_pulse_ms < INTERACTION_PULSE_VISIBLE_MS {
        // Ring that widens as the pulse fades.
        let grow = u32::from(face.interaction_pulse_ms / 100);
        Circle::with_center(Point::new(CENTER_X, 36), 52 + grow * 2)
            .into_styled(stroke(1))
            .draw(target)?;
    }

    Ok(())
}

fn draw_eye<D>(target: &mut D, center: Point, face: &FaceExpression, closed: bool) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let r = (EYE_DIAMETER / 2) as i32;

    if closed {
        return Line::new(center - Point::new(r, 0), center + Point::new(r, 0))
            .into_styled(stroke(2))
            .draw(target);
    }

    if face.eye_smile >= 3 {
        // Happy "^" eyes.
        return Arc::with_center(center + Point::new(0, 4), EYE_DIAMETER, 200.0.deg(), 140.0.deg())
            .into_styled(stroke(2))
            .draw(target);
    }

    let grow = face.eye_openness.clamp(0, 4) as u32;
    let diameter = EYE_DIAMETER + grow;
    Circle::with_center(center, diameter).into_styled(on()).draw(target)?;

    // Pupil, shifted by gaze.
    let gaze = Point::new(i32::from(face.gaze_x.clamp(-3, 3)), i32::from(face.gaze_y.clamp(-3, 3)));
    Circle::with_center(center + gaze, 5).into_styled(off()).draw(target)?;

    if face.sparkle {
        Pixel(center + Point::new(-3, -3), BinaryColor::Off).draw(target)?;
        Pixel(center + Point::new(-4, -2), BinaryColor::Off).draw(target)?;
    }

    // Heavy lids for sleepy or unhappy faces.
    let lid = (-i32::from(face.eye_openness)).clamp(0, 4) * 3;
    if lid > 0 {
        let half = diameter as i32 / 2 + 1;
        Rectangle::new(center - Point::new(half, half), Size::new(diameter + 2, lid as u32))
            .into_styled(off())
            .draw(target)?;
    }

    // Worried brow slope.
    if face.eye_smile < 0 {
        let lift = i32::from(face.eye_smile.clamp(-4, -1));
        Line::new(center + Point::new(-r, -r - 3), center + Point::new(r, -r - 3 + lift))
            .into_styled(stroke(1))
            .draw(target)?;
    }

    Ok(())
}

fn draw_mouth<D>(target: &mut D, face: &FaceExpression) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let curve = i32::from(face.mouth_curve.clamp(-4, 4));
    let diameter = (14 + curve.abs() * 3) as u32;

    if curve >= 0 {
        Arc::with_center(Point::new(CENTER_X, MOUTH_Y - 4), diameter, 30.0.deg(), 120.0.deg())
            .into_styled(stroke(2))
            .draw(target)?;
    } else {
        Arc::with_center(Point::new(CENTER_X, MOUTH_Y + 8), diameter, 210.0.deg(), 120.0.deg())
            .into_styled(stroke(2))
            .draw(target)?;
    }

    let open = face.mouth_open.clamp(0, 4) as u32;
    if open >= 2 {
        Ellipse::with_center(Point::new(CENTER_X, MOUTH_Y + 2), Size::new(8 + open, open * 2 + 2))
            .into_styled(stroke(1))
            .draw(target)?;
    }

    Ok(())
}

fn draw_heart<D>(target: &mut D, center: Point) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Circle::with_center(center + Point::new(-3, 0), 7).into_styled(on()).draw(target)?;
    Circle::with_center(center + Point::new(3, 0), 7).into_styled(on()).draw(target)?;
    Triangle::new(center + Point::new(-6, 1), center + Point::new(6, 1), center + Point::new(0, 8))
        .into_styled(on())
        .draw(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::framebuffer::FrameBuffer;

    fn render(face: &FaceExpression, blink: bool) -> FrameBuffer {
        let mut fb = FrameBuffer::new();
        draw_face(&mut fb, face, "Test", blink).unwrap();
        fb
    }

    fn lit_in(fb: &FrameBuffer, x0: u32, y0: u32, x1: u32, y1: u32) -> u32 {
        let mut n = 0;
        for x in x0..x1 {
            for y in y0..y1 {
                n += u32::from(fb.pixel(x, y));
            }
        }
        n
    }

    #[test]
    fn blink_frame_closes_the_eyes() {
        let face = FaceExpression::default();
        let open = render(&face, false);
        let shut = render(&face, true);
        assert!(lit_in(&shut, 30, 18, 100, 38) < lit_in(&open, 30, 18, 100, 38));
    }

    #[test]
    fn heart_lands_in_the_corner() {
        let plain = render(&FaceExpression::default(), false);
        let loved = render(&FaceExpression { heart: true, ..FaceExpression::default() }, false);
        assert_eq!(lit_in(&plain, 100, 0, 128, 18), 0);
        assert!(lit_in(&loved, 100, 0, 128, 18) > 20);
    }

    #[test]
    fn sleepy_lids_hide_part_of_the_eye() {
        let awake = render(&FaceExpression::default(), false);
        let sleepy = render(&FaceExpression { eye_openness: -4, ..FaceExpression::default() }, false);
        assert!(lit_in(&sleepy, 30, 18, 100, 38) < lit_in(&awake, 30, 18, 100, 38));
    }

    #[test]
    fn recent_interaction_draws_a_ring() {
        let idle = render(&FaceExpression::default(), false);
        let pulsed = render(&FaceExpression { interaction_pulse_ms: 0, ..FaceExpression::default() }, false);
        assert!(pulsed.lit_pixels() > idle.lit_pixels());
    }
}
