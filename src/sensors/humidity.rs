//! Analog relative-humidity sensor driver (HIH-4000 class, ratiometric).
//!
//! Reads the sensor's voltage output through an ESP32 ADC channel,
//! applies a two-point linear calibration, rejects implausible samples,
//! and smooths the result over a short ring buffer.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

use core::sync::atomic::{AtomicU16, Ordering};

use log::{debug, info};

use crate::error::SensorError;

static SIM_RH_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_humidity_adc(raw: u16) {
    SIM_RH_ADC.store(raw, Ordering::Relaxed);
}

const RING_BUF_CAP: usize = 5;
/// Samples discarded after power-up while the sensing element settles.
const WARMUP_READS: u32 = 3;
/// Calibrated values may overshoot the 0–100 scale slightly before
/// being clamped; anything further out is a wiring or ADC fault.
const PLAUSIBLE_MIN_RH: f32 = -5.0;
const PLAUSIBLE_MAX_RH: f32 = 105.0;

#[derive(Debug, Clone, Copy)]
pub struct HumidityReading {
    pub raw: u16,
    pub rh: f32,
    pub avg_rh: f32,
}

/// Two ADC counts and the humidity each one represents.
#[derive(Debug, Clone, Copy)]
pub struct Calibration {
    pub low_adc: u16,
    pub low_rh: f32,
    pub high_adc: u16,
    pub high_rh: f32,
}

impl Default for Calibration {
    /// HIH-4000 at 3.3 V through a 2:3 divider, 12-bit ADC, 12 dB atten.
    fn default() -> Self {
        Self {
            low_adc: 410,
            low_rh: 0.0,
            high_adc: 2_480,
            high_rh: 100.0,
        }
    }
}

pub struct HumiditySensor {
    cal: Calibration,
    ring: [f32; RING_BUF_CAP],
    head: usize,
    count: usize,
    total_reads: u32,
    _adc_gpio: i32,
}

impl HumiditySensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self {
            cal: Calibration::default(),
            ring: [0.0; RING_BUF_CAP],
            head: 0,
            count: 0,
            total_reads: 0,
            _adc_gpio: adc_gpio,
        }
    }

    pub fn set_calibration(&mut self, cal: Calibration) {
        info!(
            "Humidity calibration: {}→{:.1}%  {}→{:.1}%",
            cal.low_adc, cal.low_rh, cal.high_adc, cal.high_rh
        );
        self.cal = cal;
    }

    pub fn is_warmed_up(&self) -> bool {
        self.total_reads >= WARMUP_READS
    }

    /// Take one sample.
    pub fn read(&mut self) -> Result<HumidityReading, SensorError> {
        self.total_reads = self.total_reads.saturating_add(1);

        let raw = self.read_adc()?;
        if self.total_reads <= WARMUP_READS {
            debug!("Humidity warm-up sample {} discarded", self.total_reads);
            return Err(SensorError::WarmingUp);
        }

        let rh = self.adc_to_rh(raw).ok_or(SensorError::OutOfRange)?;

        self.ring[self.head] = rh;
        self.head = (self.head + 1) % RING_BUF_CAP;
        if self.count < RING_BUF_CAP {
            self.count += 1;
        }

        Ok(HumidityReading {
            raw,
            rh,
            avg_rh: self.running_average(),
        })
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        use crate::drivers::hw_init;
        hw_init::adc1_read(hw_init::ADC1_CH_HUMIDITY).ok_or(SensorError::AdcReadFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        Ok(SIM_RH_ADC.load(Ordering::Relaxed))
    }

    /// Linear interpolation through the two calibration points, clamped to
    /// 0–100.  `None` if the calibration is degenerate or the result is
    /// implausible.
    fn adc_to_rh(&self, raw: u16) -> Option<f32> {
        let span_adc = f32::from(self.cal.high_adc) - f32::from(self.cal.low_adc);
        if span_adc <= 0.0 {
            return None;
        }
        let slope = (self.cal.high_rh - self.cal.low_rh) / span_adc;
        let rh = self.cal.low_rh + (f32::from(raw) - f32::from(self.cal.low_adc)) * slope;
        if !(PLAUSIBLE_MIN_RH..=PLAUSIBLE_MAX_RH).contains(&rh) {
            debug!("Humidity ADC {} maps to implausible {:.1}%", raw, rh);
            return None;
        }
        Some(rh.clamp(0.0, 100.0))
    }

    fn running_average(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        let sum: f32 = self.ring[..self.count].iter().sum();
        sum / self.count as f32
    }
}
