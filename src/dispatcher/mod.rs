//! Command dispatcher
//!
//! Maps a complete request to a command, validates its body and applies it
//! to the device state. Every command builds its response before touching
//! the state, so a failed request never leaves a partial change behind.

mod dto;

#[cfg(feature = "esp32-log")]
use esp_println::println;
use heapless::Vec;
use serde::Deserialize;

pub use dto::MAX_PIXEL_WRITES;
use dto::{
    AnimationRequest, BrightnessRequest, BrightnessResponse, ColorRequest, ColorResponse,
    PixelFormat, PixelList, PixelsReadback, PixelsRequest, PixelsResponse, StatusResponse,
};

use crate::{
    animation::{ANIMATION_NAME_PIXELS, ANIMATION_NAME_SOLID, Animation, SolidParams},
    color::{Rgbw, fill, parse_hex},
    error::{DispatchError, ValidationError},
    http::{HttpMethod, RawRequest, ResponseEnvelope},
    state::{Diagnostics, DeviceState, is_valid_brightness},
    timer::AnimationTimer,
};

/// Operation requested by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetColor,
    SetAnimation,
    PatchAnimation,
    SetBrightness,
    SetPixels,
    GetBrightness,
    GetPixels,
    GetStatus,
}

const ROUTES: [(HttpMethod, &str, Command); 8] = [
    (HttpMethod::Put, "/color", Command::SetColor),
    (HttpMethod::Put, "/animation", Command::SetAnimation),
    (HttpMethod::Patch, "/animation", Command::PatchAnimation),
    (HttpMethod::Put, "/brightness", Command::SetBrightness),
    (HttpMethod::Put, "/pixels", Command::SetPixels),
    (HttpMethod::Get, "/brightness", Command::GetBrightness),
    (HttpMethod::Get, "/pixels", Command::GetPixels),
    (HttpMethod::Get, "/status", Command::GetStatus),
];

/// Look up the command for a method and path
///
/// A single trailing slash is ignored.
pub fn route(method: HttpMethod, path: &str) -> Option<Command> {
    let path = match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    };
    ROUTES
        .iter()
        .find(|(m, p, _)| *m == method && *p == path)
        .map(|(_, _, command)| *command)
}

/// Handle one complete request and produce its response
///
/// Never fails: every error becomes an error response.
pub fn handle<const MAX_LEDS: usize>(
    request: &RawRequest<'_>,
    state: &mut DeviceState<MAX_LEDS>,
    timer: &mut AnimationTimer,
    diagnostics: &Diagnostics,
) -> ResponseEnvelope {
    let result = match route(request.method, request.path) {
        Some(command) => execute(command, request, state, timer, diagnostics),
        None => Err(DispatchError::NotFound),
    };

    match result {
        Ok(response) => response,
        Err(error) => {
            #[cfg(feature = "esp32-log")]
            if let DispatchError::Internal(_e) = error {
                println!("dispatcher: internal error: {}", _e.reason());
            }
            ResponseEnvelope::error(error)
        }
    }
}

fn execute<const MAX_LEDS: usize>(
    command: Command,
    request: &RawRequest<'_>,
    state: &mut DeviceState<MAX_LEDS>,
    timer: &mut AnimationTimer,
    diagnostics: &Diagnostics,
) -> Result<ResponseEnvelope, DispatchError> {
    let body = request.body;
    match command {
        Command::SetColor => set_color(body, state, timer),
        Command::SetAnimation => set_animation(body, state, timer),
        Command::PatchAnimation => patch_animation(body, state, timer),
        Command::SetBrightness => set_brightness(body, state),
        Command::SetPixels => set_pixels(body, state, timer),
        Command::GetPixels => {
            let format = PixelFormat::from_query(request.query)?;
            Ok(ResponseEnvelope::json(
                200,
                &PixelsReadback {
                    animation: state.animation().name(),
                    pixel_count: state.pixel_count(),
                    pixels: PixelList {
                        pixels: state.pixels(),
                        format,
                        white: state.color_order().has_white(),
                    },
                },
            )?)
        }
        Command::GetBrightness => Ok(ResponseEnvelope::json(
            200,
            &BrightnessResponse {
                brightness: state.brightness(),
            },
        )?),
        Command::GetStatus => Ok(ResponseEnvelope::json(
            200,
            &StatusResponse {
                animation: state.animation().name(),
                params: state.animation(),
                brightness: state.brightness(),
                pixel_count: state.pixel_count(),
                color_order: state.color_order(),
                dropped_frames: diagnostics.dropped_frames,
            },
        )?),
    }
}

fn parse_body<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, ValidationError> {
    serde_json_core::from_slice(body)
        .map(|(value, _)| value)
        .map_err(|_| ValidationError::InvalidBody)
}

fn set_color<const MAX_LEDS: usize>(
    body: &[u8],
    state: &mut DeviceState<MAX_LEDS>,
    timer: &mut AnimationTimer,
) -> Result<ResponseEnvelope, DispatchError> {
    let request: ColorRequest = parse_body(body)?;
    let (r, g, b, w) = request.channels()?;

    let response = ResponseEnvelope::json(
        200,
        &ColorResponse {
            animation: ANIMATION_NAME_SOLID,
            r,
            g,
            b,
            w,
        },
    )?;
    let color = Rgbw::new(r, g, b, w.unwrap_or(0));
    state.set_animation(Animation::Solid(SolidParams { color }), timer);
    Ok(response)
}

fn set_animation<const MAX_LEDS: usize>(
    body: &[u8],
    state: &mut DeviceState<MAX_LEDS>,
    timer: &mut AnimationTimer,
) -> Result<ResponseEnvelope, DispatchError> {
    let request: AnimationRequest<'_> = parse_body(body)?;
    let animation = request.to_animation()?;
    animation.validate()?;

    let response = ResponseEnvelope::json(200, &animation)?;
    state.set_animation(animation, timer);
    Ok(response)
}

fn patch_animation<const MAX_LEDS: usize>(
    body: &[u8],
    state: &mut DeviceState<MAX_LEDS>,
    timer: &mut AnimationTimer,
) -> Result<ResponseEnvelope, DispatchError> {
    let request: AnimationRequest<'_> = parse_body(body)?;
    let animation = request.patch(state.animation())?;
    animation.validate()?;

    let response = ResponseEnvelope::json(200, &animation)?;
    state.patch_animation(animation, timer);
    Ok(response)
}

fn set_brightness<const MAX_LEDS: usize>(
    body: &[u8],
    state: &mut DeviceState<MAX_LEDS>,
) -> Result<ResponseEnvelope, DispatchError> {
    let request: BrightnessRequest = parse_body(body)?;
    let value = request
        .value
        .ok_or(ValidationError::MissingField("value"))?;
    if !is_valid_brightness(value) {
        return Err(ValidationError::OutOfRange("value").into());
    }

    let response = ResponseEnvelope::json(200, &BrightnessResponse { brightness: value })?;
    state.set_brightness(value)?;
    Ok(response)
}

fn set_pixels<const MAX_LEDS: usize>(
    body: &[u8],
    state: &mut DeviceState<MAX_LEDS>,
    timer: &mut AnimationTimer,
) -> Result<ResponseEnvelope, DispatchError> {
    let request: PixelsRequest<'_> = parse_body(body)?;
    let entries = request
        .pixels
        .ok_or(ValidationError::MissingField("pixels"))?;

    // Resolve every entry first; one bad entry rejects the whole request
    let mut writes: Vec<(usize, Rgbw), MAX_PIXEL_WRITES> = Vec::new();
    for entry in &entries {
        let index = entry.index.ok_or(ValidationError::MissingField("index"))?;
        let index = usize::try_from(index)
            .ok()
            .filter(|index| *index < state.pixel_count())
            .ok_or(ValidationError::OutOfRange("index"))?;
        let hex = entry.color.ok_or(ValidationError::MissingField("color"))?;
        let color = parse_hex(hex).ok_or(ValidationError::InvalidColor("color"))?;
        writes
            .push((index, color))
            .map_err(|_| ValidationError::OutOfRange("pixels"))?;
    }

    let response = ResponseEnvelope::json(
        200,
        &PixelsResponse {
            animation: ANIMATION_NAME_PIXELS,
            updated: writes.len(),
        },
    )?;

    if *state.animation() != Animation::Pixels {
        state.set_animation(Animation::Pixels, timer);
    }
    let pixels = state.pixels_mut();
    if request.clear.unwrap_or(false) {
        fill(pixels, Rgbw::BLACK);
    }
    for (index, color) in writes {
        pixels[index] = color;
    }
    Ok(response)
}
