mod tests {
    use rgb_led_httpserver::animation::{CometParams, SolidParams};
    use rgb_led_httpserver::dispatcher::{handle, route};
    use rgb_led_httpserver::{
        Animation, AnimationTimer, Command, DeviceConfig, DeviceState, Diagnostics, HttpMethod,
        Instant, RawRequest, ResponseEnvelope, Rgbw,
    };

    const RED: Rgbw = Rgbw::from_rgb(255, 0, 0);
    const BLUE: Rgbw = Rgbw::from_rgb(0, 0, 255);

    struct Device {
        state: DeviceState<16>,
        timer: AnimationTimer,
        diagnostics: Diagnostics,
    }

    impl Device {
        fn new() -> Self {
            let config = DeviceConfig {
                pixel_count: 8,
                ..DeviceConfig::default()
            };
            Self {
                state: DeviceState::new(&config).unwrap(),
                timer: AnimationTimer::new(),
                diagnostics: Diagnostics::default(),
            }
        }

        fn request(&mut self, method: HttpMethod, path: &str, body: &str) -> ResponseEnvelope {
            let request = RawRequest::new(method, path, body.as_bytes());
            handle(&request, &mut self.state, &mut self.timer, &self.diagnostics)
        }

        fn put(&mut self, path: &str, body: &str) -> ResponseEnvelope {
            self.request(HttpMethod::Put, path, body)
        }

        fn get(&mut self, path: &str) -> ResponseEnvelope {
            self.request(HttpMethod::Get, path, "")
        }

        fn patch(&mut self, path: &str, body: &str) -> ResponseEnvelope {
            self.request(HttpMethod::Patch, path, body)
        }

        /// Run the animation timer forward to `ms`
        fn run_for(&mut self, ms: u64) {
            self.timer.advance(Instant::from_millis(0));
            self.timer.advance(Instant::from_millis(ms));
        }
    }

    fn assert_error(response: &ResponseEnvelope, status: u16, body: &str) {
        assert_eq!(response.status(), status);
        assert_eq!(response.body_str(), Some(body));
    }

    #[test]
    fn test_routes() {
        assert_eq!(route(HttpMethod::Put, "/color"), Some(Command::SetColor));
        assert_eq!(route(HttpMethod::Put, "/pixels/"), Some(Command::SetPixels));
        assert_eq!(route(HttpMethod::Get, "/brightness"), Some(Command::GetBrightness));
        assert_eq!(route(HttpMethod::Put, "/brightness"), Some(Command::SetBrightness));
        assert_eq!(route(HttpMethod::Get, "/status"), Some(Command::GetStatus));
        assert_eq!(route(HttpMethod::Get, "/pixels"), Some(Command::GetPixels));
        assert_eq!(
            route(HttpMethod::Patch, "/animation"),
            Some(Command::PatchAnimation)
        );
        assert_eq!(route(HttpMethod::Other, "/status"), None);
        assert_eq!(route(HttpMethod::Post, "/color"), None);
        assert_eq!(route(HttpMethod::Get, "/"), None);
        assert_eq!(route(HttpMethod::Get, "/status//"), None);
    }

    #[test]
    fn test_set_color() {
        let mut device = Device::new();
        let response = device.put("/color", r#"{"r":255,"g":0,"b":0}"#);
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.body_str(),
            Some(r#"{"animation":"solid","r":255,"g":0,"b":0}"#)
        );
        assert_eq!(
            device.state.animation(),
            &Animation::Solid(SolidParams { color: RED })
        );

        let response = device.put("/color", r#"{"r":1,"g":2,"b":3,"w":4}"#);
        assert_eq!(
            response.body_str(),
            Some(r#"{"animation":"solid","r":1,"g":2,"b":3,"w":4}"#)
        );
        assert_eq!(
            device.state.animation(),
            &Animation::Solid(SolidParams {
                color: Rgbw::new(1, 2, 3, 4)
            })
        );
    }

    #[test]
    fn test_set_color_rejected() {
        let mut device = Device::new();
        assert_error(
            &device.put("/color", r#"{"r":256,"g":0,"b":0}"#),
            400,
            r#"{"error":"out_of_range","field":"r"}"#,
        );
        assert_error(
            &device.put("/color", r#"{"r":0,"g":0,"b":-1}"#),
            400,
            r#"{"error":"out_of_range","field":"b"}"#,
        );
        assert_error(
            &device.put("/color", r#"{"r":0,"b":0}"#),
            400,
            r#"{"error":"missing_field","field":"g"}"#,
        );
        assert_error(&device.put("/color", "red"), 400, r#"{"error":"invalid_body"}"#);
        assert_error(&device.put("/color", ""), 400, r#"{"error":"invalid_body"}"#);
        assert_eq!(device.state.animation(), &Animation::Off);
    }

    #[test]
    fn test_set_brightness() {
        let mut device = Device::new();
        let response = device.put("/brightness", r#"{"value":0.5}"#);
        assert_eq!(response.status(), 200);
        assert!(response.body_str().unwrap().starts_with(r#"{"brightness":"#));
        assert!((device.state.brightness() - 0.5).abs() < f32::EPSILON);
        assert_eq!(device.state.brightness_level(), 128);

        let response = device.get("/brightness");
        assert_eq!(response.status(), 200);
        assert!(response.body_str().unwrap().starts_with(r#"{"brightness":0.5"#));
    }

    #[test]
    fn test_set_brightness_rejected_keeps_state() {
        let mut device = Device::new();
        assert_error(
            &device.put("/brightness", r#"{"value":1.5}"#),
            400,
            r#"{"error":"out_of_range","field":"value"}"#,
        );
        assert_error(
            &device.put("/brightness", r#"{"value":-0.1}"#),
            400,
            r#"{"error":"out_of_range","field":"value"}"#,
        );
        assert_error(
            &device.put("/brightness", "{}"),
            400,
            r#"{"error":"missing_field","field":"value"}"#,
        );
        assert!((device.state.brightness() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_not_found() {
        let mut device = Device::new();
        assert_error(&device.get("/nope"), 404, r#"{"error":"not_found"}"#);
        assert_error(&device.put("/status", "{}"), 404, r#"{"error":"not_found"}"#);
        assert_error(
            &device.request(HttpMethod::Post, "/color", r#"{"r":1,"g":2,"b":3}"#),
            404,
            r#"{"error":"not_found"}"#,
        );
        assert_eq!(device.state.animation(), &Animation::Off);
    }

    #[test]
    fn test_trailing_slash() {
        let mut device = Device::new();
        assert_eq!(device.get("/status/").status(), 200);
    }

    #[test]
    fn test_set_animation() {
        let mut device = Device::new();
        let response = device.put(
            "/animation",
            r##"{"name":"comet","color":"#00ff00","tail_length":4,"bounce":true}"##,
        );
        assert_eq!(response.status(), 200);
        let body = response.body_str().unwrap();
        assert!(body.starts_with(r##"{"name":"comet","color":"#00ff00","speed":1"##));
        assert!(body.ends_with(r#""tail_length":4,"bounce":true,"reverse":false}"#));
        assert_eq!(
            device.state.animation(),
            &Animation::Comet(CometParams {
                color: Rgbw::from_rgb(0, 255, 0),
                speed: 1.0,
                tail_length: 4,
                bounce: true,
                reverse: false,
            })
        );
    }

    #[test]
    fn test_set_animation_defaults() {
        let mut device = Device::new();
        let response = device.put("/animation", r#"{"name":"chase","color":"0xff0000"}"#);
        assert_eq!(response.status(), 200);
        match device.state.animation() {
            Animation::Chase(params) => {
                assert_eq!(params.color, RED);
                assert_eq!(params.size, 2);
                assert_eq!(params.spacing, 3);
                assert!(!params.reverse);
            }
            other => panic!("unexpected animation {other:?}"),
        }

        assert_eq!(device.put("/animation", r#"{"name":"off"}"#).status(), 200);
        assert_eq!(device.state.animation(), &Animation::Off);
    }

    #[test]
    fn test_set_color_cycle() {
        let mut device = Device::new();
        let response = device.put(
            "/animation",
            r##"{"name":"colorcycle","colors":["#ff0000","0x0000ff"],"speed":2}"##,
        );
        assert_eq!(response.status(), 200);
        match device.state.animation() {
            Animation::ColorCycle(params) => {
                assert_eq!(params.colors.as_slice(), &[RED, BLUE]);
                assert!((params.speed - 2.0).abs() < f32::EPSILON);
            }
            other => panic!("unexpected animation {other:?}"),
        }

        assert_error(
            &device.put("/animation", r#"{"name":"colorcycle","colors":[]}"#),
            400,
            r#"{"error":"missing_field","field":"colors"}"#,
        );
        assert_error(
            &device.put("/animation", r#"{"name":"colorcycle","colors":["blue"]}"#),
            400,
            r#"{"error":"invalid_color","field":"colors"}"#,
        );
    }

    #[test]
    fn test_set_animation_rejected() {
        let mut device = Device::new();
        assert_error(
            &device.put("/animation", r#"{"name":"sparkle"}"#),
            400,
            r#"{"error":"unknown_animation"}"#,
        );
        assert_error(
            &device.put("/animation", r#"{"speed":1.0}"#),
            400,
            r#"{"error":"missing_field","field":"name"}"#,
        );
        assert_error(
            &device.put("/animation", r#"{"name":"solid","color":"green"}"#),
            400,
            r#"{"error":"invalid_color","field":"color"}"#,
        );
        assert_error(
            &device.put("/animation", r#"{"name":"blink"}"#),
            400,
            r#"{"error":"missing_field","field":"color"}"#,
        );
        assert_error(
            &device.put("/animation", r#"{"name":"rainbow","speed":0}"#),
            400,
            r#"{"error":"out_of_range","field":"speed"}"#,
        );
        assert_error(
            &device.put("/animation", r#"{"name":"rainbow","speed":500}"#),
            400,
            r#"{"error":"out_of_range","field":"speed"}"#,
        );
        assert_error(
            &device.put("/animation", r##"{"name":"comet","color":"#fff000","tail_length":0}"##),
            400,
            r#"{"error":"out_of_range","field":"tail_length"}"#,
        );
        assert_error(
            &device.put("/animation", r##"{"name":"chase","color":"#fff000","size":300}"##),
            400,
            r#"{"error":"out_of_range","field":"size"}"#,
        );
        assert_eq!(device.state.animation(), &Animation::Off);
    }

    #[test]
    fn test_repeated_command_restarts_timer() {
        let mut device = Device::new();
        device.put("/color", r#"{"r":255,"g":0,"b":0}"#);
        device.timer.advance(Instant::from_millis(0));
        device.timer.advance(Instant::from_millis(1000));
        assert_eq!(device.timer.elapsed().as_millis(), 1000);

        device.put("/color", r#"{"r":255,"g":0,"b":0}"#);
        assert_eq!(device.timer.elapsed().as_millis(), 0);
        assert_eq!(
            device.state.animation(),
            &Animation::Solid(SolidParams { color: RED })
        );
    }

    #[test]
    fn test_rejected_command_keeps_timer() {
        let mut device = Device::new();
        device.timer.advance(Instant::from_millis(0));
        device.timer.advance(Instant::from_millis(700));
        device.put("/animation", r#"{"name":"sparkle"}"#);
        assert_eq!(device.timer.elapsed().as_millis(), 700);
    }

    #[test]
    fn test_set_pixels() {
        let mut device = Device::new();
        let response = device.put(
            "/pixels",
            r##"{"pixels":[{"index":0,"color":"#ff0000"},{"index":3,"color":"#0000ff"}]}"##,
        );
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.body_str(),
            Some(r#"{"animation":"pixels","updated":2}"#)
        );
        assert_eq!(device.state.animation(), &Animation::Pixels);

        let pixels = device.state.pixels();
        assert_eq!(pixels.len(), 8);
        assert_eq!(pixels[0], RED);
        assert_eq!(pixels[3], BLUE);
        assert_eq!(pixels[1], Rgbw::BLACK);
    }

    #[test]
    fn test_set_pixels_accumulates_until_cleared() {
        let mut device = Device::new();
        device.put("/pixels", r##"{"pixels":[{"index":1,"color":"#ff0000"}]}"##);
        device.put("/pixels", r##"{"pixels":[{"index":2,"color":"#0000ff"}]}"##);
        assert_eq!(device.state.pixels()[1], RED);
        assert_eq!(device.state.pixels()[2], BLUE);

        device.put(
            "/pixels",
            r##"{"pixels":[{"index":4,"color":"#ff0000"}],"clear":true}"##,
        );
        assert_eq!(device.state.pixels()[1], Rgbw::BLACK);
        assert_eq!(device.state.pixels()[2], Rgbw::BLACK);
        assert_eq!(device.state.pixels()[4], RED);
    }

    #[test]
    fn test_set_pixels_rejected() {
        let mut device = Device::new();
        assert_error(
            &device.put("/pixels", r##"{"pixels":[{"index":8,"color":"#ff0000"}]}"##),
            400,
            r#"{"error":"out_of_range","field":"index"}"#,
        );
        assert_error(
            &device.put(
                "/pixels",
                r##"{"pixels":[{"index":0,"color":"#ff0000"},{"index":1,"color":"red"}]}"##,
            ),
            400,
            r#"{"error":"invalid_color","field":"color"}"#,
        );
        assert_error(
            &device.put("/pixels", r#"{"clear":true}"#),
            400,
            r#"{"error":"missing_field","field":"pixels"}"#,
        );

        let entries: Vec<String> = (0..17)
            .map(|i| format!(r##"{{"index":{},"color":"#ff0000"}}"##, i % 8))
            .collect();
        let body = format!(r#"{{"pixels":[{}]}}"#, entries.join(","));
        assert_error(&device.put("/pixels", &body), 400, r#"{"error":"invalid_body"}"#);

        assert_eq!(device.state.animation(), &Animation::Off);
        assert!(device.state.pixels().iter().all(|px| *px == Rgbw::BLACK));
    }


    #[test]
    fn test_get_pixels_hex() {
        let mut device = Device::new();
        device.put(
            "/pixels",
            r##"{"pixels":[{"index":0,"color":"#ff0000"},{"index":3,"color":"#0000ff"}]}"##,
        );

        let response = device.get("/pixels");
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.body_str(),
            Some(concat!(
                r#"{"animation":"pixels","pixel_count":8,"pixels":["#,
                r##""#ff0000","#000000","#000000","#0000ff","##,
                r##""#000000","#000000","#000000","#000000"]}"##,
            ))
        );
        assert_eq!(device.get("/pixels?color_type=hex").body(), response.body());
    }

    #[test]
    fn test_get_pixels_rgb() {
        let mut device = Device::new();
        device.put("/pixels", r##"{"pixels":[{"index":1,"color":"#102030"}]}"##);

        let response = device.get("/pixels?color_type=rgb");
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.body_str(),
            Some(concat!(
                r#"{"animation":"pixels","pixel_count":8,"pixels":["#,
                "[[0,0,0],[16,32,48],[0,0,0],[0,0,0],",
                "[0,0,0],[0,0,0],[0,0,0],[0,0,0]]}",
            ))
        );

        assert_error(
            &device.get("/pixels?color_type=hsv"),
            400,
            r#"{"error":"out_of_range","field":"color_type"}"#,
        );
    }

    #[test]
    fn test_patch_animation_keeps_timer() {
        let mut device = Device::new();
        device.put(
            "/animation",
            r##"{"name":"comet","color":"#00ff00","speed":1.0,"tail_length":4}"##,
        );
        device.run_for(1500);

        let response = device.patch("/animation", r##"{"speed":2.5,"color":"#0000ff"}"##);
        assert_eq!(response.status(), 200);
        assert!(response.body_str().unwrap().starts_with(r#"{"name":"comet""#));
        assert_eq!(device.timer.elapsed().as_millis(), 1500);
        assert_eq!(
            device.state.animation(),
            &Animation::Comet(CometParams {
                color: BLUE,
                speed: 2.5,
                tail_length: 4,
                bounce: false,
                reverse: false,
            })
        );

        // naming the running animation is allowed
        let response = device.patch("/animation", r#"{"name":"comet","reverse":true}"#);
        assert_eq!(response.status(), 200);
        assert_eq!(device.timer.elapsed().as_millis(), 1500);
        match device.state.animation() {
            Animation::Comet(params) => {
                assert!(params.reverse);
                assert_eq!(params.color, BLUE);
            }
            other => panic!("unexpected animation {other:?}"),
        }
    }

    #[test]
    fn test_patch_animation_rejected() {
        let mut device = Device::new();
        device.put("/animation", r#"{"name":"rainbow","speed":1.0}"#);
        device.run_for(400);
        let before = device.state.animation().clone();

        assert_error(
            &device.patch("/animation", r#"{"speed":0}"#),
            400,
            r#"{"error":"out_of_range","field":"speed"}"#,
        );
        assert_error(
            &device.patch("/animation", r##"{"color":"#ff0000"}"##),
            400,
            r#"{"error":"invalid_property","field":"color"}"#,
        );
        assert_error(
            &device.patch("/animation", r#"{"name":"pulse","speed":2.0}"#),
            400,
            r#"{"error":"invalid_property","field":"name"}"#,
        );
        assert_error(&device.patch("/animation", "speed"), 400, r#"{"error":"invalid_body"}"#);

        assert_eq!(device.state.animation(), &before);
        assert_eq!(device.timer.elapsed().as_millis(), 400);
    }

    #[test]
    fn test_patch_animation_validates_like_set() {
        let mut device = Device::new();
        device.put("/animation", r#"{"name":"chase","color":"0xff0000"}"#);
        assert_error(
            &device.patch("/animation", r#"{"size":300}"#),
            400,
            r#"{"error":"out_of_range","field":"size"}"#,
        );
        assert_error(
            &device.patch("/animation", r#"{"color":"red"}"#),
            400,
            r#"{"error":"invalid_color","field":"color"}"#,
        );

        assert_eq!(device.patch("/animation", r#"{"spacing":5}"#).status(), 200);
        match device.state.animation() {
            Animation::Chase(params) => {
                assert_eq!(params.color, RED);
                assert_eq!(params.size, 2);
                assert_eq!(params.spacing, 5);
            }
            other => panic!("unexpected animation {other:?}"),
        }
    }

    #[test]
    fn test_status() {
        let mut device = Device::new();
        device.diagnostics.dropped_frames = 3;
        device.put("/animation", r#"{"name":"rainbow","speed":1}"#);

        let response = device.get("/status?verbose=1");
        assert_eq!(response.status(), 200);
        let body = response.body_str().unwrap();
        assert!(body.starts_with(r#"{"animation":"rainbow","params":{"name":"rainbow","speed":1"#));
        assert!(body.contains(r#""brightness":1"#));
        assert!(body.ends_with(r#""pixel_count":8,"color_order":"GRB","dropped_frames":3}"#));
    }
}
