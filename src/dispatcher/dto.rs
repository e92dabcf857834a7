//! Request and response bodies of the HTTP surface

use heapless::Vec;
use serde::{Deserialize, Serialize, Serializer, ser::SerializeSeq};

use crate::{
    animation::{
        ANIMATION_NAME_BLINK, ANIMATION_NAME_CHASE, ANIMATION_NAME_COLOR_CYCLE,
        ANIMATION_NAME_COMET, ANIMATION_NAME_OFF, ANIMATION_NAME_PIXELS, ANIMATION_NAME_PULSE,
        ANIMATION_NAME_RAINBOW, ANIMATION_NAME_SOLID, Animation, BlinkParams, ChaseParams,
        ColorCycleParams, CometParams, DEFAULT_CHASE_SIZE, DEFAULT_CHASE_SPACING, DEFAULT_SPEED,
        DEFAULT_TAIL_LENGTH, MAX_CYCLE_COLORS, PulseParams, RainbowParams, SolidParams,
    },
    color::{ColorOrder, Rgbw, parse_hex},
    error::ValidationError,
};

/// Maximum number of pixel writes in one `/pixels` request
pub const MAX_PIXEL_WRITES: usize = 16;

/// `PUT /color`
#[derive(Debug, Deserialize)]
pub(crate) struct ColorRequest {
    r: Option<i32>,
    g: Option<i32>,
    b: Option<i32>,
    w: Option<i32>,
}

impl ColorRequest {
    /// Validated channels; `w` is `None` when the client did not send it
    pub(crate) fn channels(&self) -> Result<(u8, u8, u8, Option<u8>), ValidationError> {
        let r = channel(self.r.ok_or(ValidationError::MissingField("r"))?, "r")?;
        let g = channel(self.g.ok_or(ValidationError::MissingField("g"))?, "g")?;
        let b = channel(self.b.ok_or(ValidationError::MissingField("b"))?, "b")?;
        let w = self.w.map(|w| channel(w, "w")).transpose()?;
        Ok((r, g, b, w))
    }
}

/// `PUT /brightness`
#[derive(Debug, Deserialize)]
pub(crate) struct BrightnessRequest {
    pub(crate) value: Option<f32>,
}

/// `PUT /animation`
#[derive(Debug, Deserialize)]
pub(crate) struct AnimationRequest<'a> {
    #[serde(borrow)]
    name: Option<&'a str>,
    #[serde(borrow)]
    color: Option<&'a str>,
    #[serde(borrow)]
    colors: Option<Vec<&'a str, MAX_CYCLE_COLORS>>,
    speed: Option<f32>,
    tail_length: Option<i32>,
    size: Option<i32>,
    spacing: Option<i32>,
    bounce: Option<bool>,
    reverse: Option<bool>,
}

impl AnimationRequest<'_> {
    /// Resolve the request into an animation
    ///
    /// Omitted optional parameters take their defaults; the result still has
    /// to pass [`Animation::validate`].
    pub(crate) fn to_animation(&self) -> Result<Animation, ValidationError> {
        let name = self.name.ok_or(ValidationError::MissingField("name"))?;
        let speed = self.speed.unwrap_or(DEFAULT_SPEED);
        let reverse = self.reverse.unwrap_or(false);

        Ok(match name {
            ANIMATION_NAME_OFF => Animation::Off,
            ANIMATION_NAME_SOLID => Animation::Solid(SolidParams {
                color: self.color()?,
            }),
            ANIMATION_NAME_BLINK => Animation::Blink(BlinkParams {
                color: self.color()?,
                speed,
            }),
            ANIMATION_NAME_PULSE => Animation::Pulse(PulseParams {
                color: self.color()?,
                speed,
            }),
            ANIMATION_NAME_RAINBOW => Animation::Rainbow(RainbowParams { speed }),
            ANIMATION_NAME_COMET => Animation::Comet(CometParams {
                color: self.color()?,
                speed,
                tail_length: small(self.tail_length, DEFAULT_TAIL_LENGTH, "tail_length")?,
                bounce: self.bounce.unwrap_or(false),
                reverse,
            }),
            ANIMATION_NAME_CHASE => Animation::Chase(ChaseParams {
                color: self.color()?,
                speed,
                size: small(self.size, DEFAULT_CHASE_SIZE, "size")?,
                spacing: small(self.spacing, DEFAULT_CHASE_SPACING, "spacing")?,
                reverse,
            }),
            ANIMATION_NAME_COLOR_CYCLE => Animation::ColorCycle(ColorCycleParams {
                colors: self.cycle_colors()?,
                speed,
            }),
            ANIMATION_NAME_PIXELS => Animation::Pixels,
            _ => return Err(ValidationError::UnknownAnimation),
        })
    }

    /// Apply the present fields to a copy of the running animation
    ///
    /// Only parameters of the running variant may be sent; `name`, if
    /// present, must match it. The result still has to pass
    /// [`Animation::validate`].
    pub(crate) fn patch(&self, current: &Animation) -> Result<Animation, ValidationError> {
        if self.name.is_some_and(|name| name != current.name()) {
            return Err(ValidationError::InvalidProperty("name"));
        }

        let mut animation = current.clone();
        match &mut animation {
            Animation::Off | Animation::Pixels => self.only(&[])?,
            Animation::Solid(params) => {
                self.only(&["color"])?;
                self.patch_color(&mut params.color)?;
            }
            Animation::Blink(BlinkParams { color, speed })
            | Animation::Pulse(PulseParams { color, speed }) => {
                self.only(&["color", "speed"])?;
                self.patch_color(color)?;
                self.patch_speed(speed);
            }
            Animation::Rainbow(params) => {
                self.only(&["speed"])?;
                self.patch_speed(&mut params.speed);
            }
            Animation::Comet(params) => {
                self.only(&["color", "speed", "tail_length", "bounce", "reverse"])?;
                self.patch_color(&mut params.color)?;
                self.patch_speed(&mut params.speed);
                params.tail_length = small(self.tail_length, params.tail_length, "tail_length")?;
                params.bounce = self.bounce.unwrap_or(params.bounce);
                params.reverse = self.reverse.unwrap_or(params.reverse);
            }
            Animation::Chase(params) => {
                self.only(&["color", "speed", "size", "spacing", "reverse"])?;
                self.patch_color(&mut params.color)?;
                self.patch_speed(&mut params.speed);
                params.size = small(self.size, params.size, "size")?;
                params.spacing = small(self.spacing, params.spacing, "spacing")?;
                params.reverse = self.reverse.unwrap_or(params.reverse);
            }
            Animation::ColorCycle(params) => {
                self.only(&["colors", "speed"])?;
                if self.colors.is_some() {
                    params.colors = self.cycle_colors()?;
                }
                self.patch_speed(&mut params.speed);
            }
        }
        Ok(animation)
    }

    /// Reject any present parameter outside of `allowed`
    fn only(&self, allowed: &[&str]) -> Result<(), ValidationError> {
        let present = [
            ("color", self.color.is_some()),
            ("colors", self.colors.is_some()),
            ("speed", self.speed.is_some()),
            ("tail_length", self.tail_length.is_some()),
            ("size", self.size.is_some()),
            ("spacing", self.spacing.is_some()),
            ("bounce", self.bounce.is_some()),
            ("reverse", self.reverse.is_some()),
        ];
        match present
            .into_iter()
            .find(|(field, sent)| *sent && !allowed.contains(field))
        {
            Some((field, _)) => Err(ValidationError::InvalidProperty(field)),
            None => Ok(()),
        }
    }

    fn patch_color(&self, color: &mut Rgbw) -> Result<(), ValidationError> {
        if self.color.is_some() {
            *color = self.color()?;
        }
        Ok(())
    }

    fn patch_speed(&self, speed: &mut f32) {
        if let Some(value) = self.speed {
            *speed = value;
        }
    }

    fn color(&self) -> Result<Rgbw, ValidationError> {
        let hex = self.color.ok_or(ValidationError::MissingField("color"))?;
        parse_hex(hex).ok_or(ValidationError::InvalidColor("color"))
    }

    fn cycle_colors(&self) -> Result<Vec<Rgbw, MAX_CYCLE_COLORS>, ValidationError> {
        let hexes = self
            .colors
            .as_ref()
            .ok_or(ValidationError::MissingField("colors"))?;
        let mut colors = Vec::new();
        for hex in hexes {
            let color = parse_hex(hex).ok_or(ValidationError::InvalidColor("colors"))?;
            colors
                .push(color)
                .map_err(|_| ValidationError::OutOfRange("colors"))?;
        }
        Ok(colors)
    }
}

/// One entry of `PUT /pixels`
#[derive(Debug, Deserialize)]
pub(crate) struct PixelWrite<'a> {
    pub(crate) index: Option<i32>,
    #[serde(borrow)]
    pub(crate) color: Option<&'a str>,
}

/// `PUT /pixels`
#[derive(Debug, Deserialize)]
pub(crate) struct PixelsRequest<'a> {
    #[serde(borrow)]
    pub(crate) pixels: Option<Vec<PixelWrite<'a>, MAX_PIXEL_WRITES>>,
    pub(crate) clear: Option<bool>,
}

/// Pixel encoding of `GET /pixels`, from the `color_type` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PixelFormat {
    Hex,
    Rgb,
}

impl PixelFormat {
    pub(crate) fn from_query(query: Option<&str>) -> Result<Self, ValidationError> {
        let value = query
            .into_iter()
            .flat_map(|query| query.split('&'))
            .find_map(|pair| pair.strip_prefix("color_type="));
        match value {
            None | Some("hex") => Ok(Self::Hex),
            Some("rgb") => Ok(Self::Rgb),
            Some(_) => Err(ValidationError::OutOfRange("color_type")),
        }
    }
}

/// Pixels serialized one by one, without an intermediate list
pub(crate) struct PixelList<'a> {
    pub(crate) pixels: &'a [Rgbw],
    pub(crate) format: PixelFormat,
    pub(crate) white: bool,
}

impl Serialize for PixelList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.pixels.len()))?;
        for px in self.pixels {
            match self.format {
                PixelFormat::Hex => seq.serialize_element(px)?,
                PixelFormat::Rgb if self.white => {
                    seq.serialize_element(&[px.r, px.g, px.b, px.w])?;
                }
                PixelFormat::Rgb => seq.serialize_element(&[px.r, px.g, px.b])?,
            }
        }
        seq.end()
    }
}

#[derive(Serialize)]
pub(crate) struct PixelsReadback<'a> {
    pub(crate) animation: &'static str,
    pub(crate) pixel_count: usize,
    pub(crate) pixels: PixelList<'a>,
}

#[derive(Serialize)]
pub(crate) struct ColorResponse {
    pub(crate) animation: &'static str,
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) w: Option<u8>,
}

#[derive(Serialize)]
pub(crate) struct BrightnessResponse {
    pub(crate) brightness: f32,
}

#[derive(Serialize)]
pub(crate) struct PixelsResponse {
    pub(crate) animation: &'static str,
    pub(crate) updated: usize,
}

#[derive(Serialize)]
pub(crate) struct StatusResponse<'a> {
    pub(crate) animation: &'static str,
    pub(crate) params: &'a Animation,
    pub(crate) brightness: f32,
    pub(crate) pixel_count: usize,
    pub(crate) color_order: ColorOrder,
    pub(crate) dropped_frames: u32,
}

fn channel(value: i32, field: &'static str) -> Result<u8, ValidationError> {
    u8::try_from(value).map_err(|_| ValidationError::OutOfRange(field))
}

fn small(value: Option<i32>, default: u8, field: &'static str) -> Result<u8, ValidationError> {
    value.map_or(Ok(default), |value| channel(value, field))
}
