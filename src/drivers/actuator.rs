// Tilt Timer - LED & Piezo Driver
//
// Status LED on a plain GPIO; piezo driven by an LEDC PWM channel so a tone
// keeps sounding without any CPU involvement between melody steps.

use esp_idf_hal::gpio::{AnyOutputPin, Output, Pin, PinDriver};

use tilt_timer::Actuator;

const LEDC_MODE: esp_idf_sys::ledc_mode_t = esp_idf_sys::ledc_mode_t_LEDC_LOW_SPEED_MODE;
const LEDC_TIMER: esp_idf_sys::ledc_timer_t = esp_idf_sys::ledc_timer_t_LEDC_TIMER_0;
const LEDC_CHANNEL: esp_idf_sys::ledc_channel_t = esp_idf_sys::ledc_channel_t_LEDC_CHANNEL_0;
const LEDC_RESOLUTION: esp_idf_sys::ledc_timer_bit_t = esp_idf_sys::ledc_timer_bit_t_LEDC_TIMER_10_BIT;
const HALF_DUTY: u32 = 1 << 9; // 50% square wave at 10-bit resolution
const INITIAL_FREQ_HZ: u32 = 1000;

pub struct AlarmOutputs<'d> {
    led: PinDriver<'d, AnyOutputPin, Output>,
    // Held so nothing else can claim the piezo GPIO.
    _piezo_pin: AnyOutputPin,
}

impl<'d> AlarmOutputs<'d> {
    /// Configure the LEDC timer/channel for the piezo and start silent with
    /// the LED off.
    pub fn new(led: PinDriver<'d, AnyOutputPin, Output>, piezo_pin: AnyOutputPin) -> anyhow::Result<Self> {
        // SAFETY: plain configuration structs; every field not set here is
        // valid as zero (clk_cfg 0 is LEDC_AUTO_CLK).
        unsafe {
            let timer_cfg = esp_idf_sys::ledc_timer_config_t {
                speed_mode: LEDC_MODE,
                duty_resolution: LEDC_RESOLUTION,
                timer_num: LEDC_TIMER,
                freq_hz: INITIAL_FREQ_HZ,
                ..core::mem::zeroed()
            };
            esp_idf_sys::esp!(esp_idf_sys::ledc_timer_config(&timer_cfg))?;

            let chan_cfg = esp_idf_sys::ledc_channel_config_t {
                gpio_num: piezo_pin.pin(),
                speed_mode: LEDC_MODE,
                channel: LEDC_CHANNEL,
                timer_sel: LEDC_TIMER,
                duty: 0,
                hpoint: 0,
                ..core::mem::zeroed()
            };
            esp_idf_sys::esp!(esp_idf_sys::ledc_channel_config(&chan_cfg))?;
        }

        let mut outputs = Self {
            led,
            _piezo_pin: piezo_pin,
        };
        outputs.set_led(false);
        outputs.stop_tone();
        log::info!("LED and piezo outputs ready");
        Ok(outputs)
    }

    fn set_duty(&mut self, duty: u32) -> anyhow::Result<()> {
        unsafe {
            esp_idf_sys::esp!(esp_idf_sys::ledc_set_duty(LEDC_MODE, LEDC_CHANNEL, duty))?;
            esp_idf_sys::esp!(esp_idf_sys::ledc_update_duty(LEDC_MODE, LEDC_CHANNEL))?;
        }
        Ok(())
    }

    fn start_tone(&mut self, freq_hz: u32) -> anyhow::Result<()> {
        unsafe {
            esp_idf_sys::esp!(esp_idf_sys::ledc_set_freq(LEDC_MODE, LEDC_TIMER, freq_hz))?;
        }
        self.set_duty(HALF_DUTY)
    }
}

impl Actuator for AlarmOutputs<'_> {
    fn set_led(&mut self, on: bool) {
        let result = if on {
            self.led.set_high()
        } else {
            self.led.set_low()
        };
        if let Err(e) = result {
            log::warn!("LED write failed: {}", e);
        }
    }

    fn play_tone(&mut self, freq_hz: u32) {
        if let Err(e) = self.start_tone(freq_hz) {
            log::warn!("Tone {} Hz failed: {}", freq_hz, e);
        }
    }

    fn stop_tone(&mut self) {
        if let Err(e) = self.set_duty(0) {
            log::warn!("Silencing piezo failed: {}", e);
        }
    }
}
