use crate::error::SessionFault;
use labpro_types::{AnalogOp, Channel, ChannelClass, PostProc, SamplingMode, SonicOp};

/// Caller-owned acquisition configuration for one channel.
///
/// Sessions abstract over the LabPro's command-oriented data collection:
/// fill one in per channel, and re-run [`validate`](Self::validate) after
/// every edit so the user can be warned before anything is sent to the
/// device. The library never mutates a session.
#[derive(Clone, Debug)]
pub struct AcquisitionSession {
    pub channel: Channel,
    /// Operation for analog channels; must stay `Off` on any other class.
    pub analog_op: AnalogOp,
    /// Operation for sonic channels; must stay `Reset` on any other class.
    pub sonic_op: SonicOp,
    pub postproc: PostProc,
    pub sampling_mode: SamplingMode,
    /// Manual conversion equation, for sensors without Auto-ID.
    pub conversion_equation: Option<String>,
    /// Temperature-compensation equation for sonic measurements.
    pub sonic_temp_compensation: Option<String>,
}

impl AcquisitionSession {
    /// A quiet session on `channel`: no operations, no post-processing,
    /// non-realtime sampling.
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            analog_op: AnalogOp::Off,
            sonic_op: SonicOp::Reset,
            postproc: PostProc::None,
            sampling_mode: SamplingMode::NonRealtime,
            conversion_equation: None,
            sonic_temp_compensation: None,
        }
    }

    /// Evaluate every applicable rule and return the full set of
    /// violations, never stopping at the first. A session can break more
    /// than one rule at a time and all of them are reported together.
    pub fn validate(&self) -> Vec<SessionFault> {
        let mut faults = Vec::new();

        let analog_selected = self.analog_op != AnalogOp::Off;
        let sonic_selected = self.sonic_op != SonicOp::Reset;
        if (analog_selected && !self.channel.is_analog())
            || (sonic_selected && !self.channel.is_sonic())
        {
            faults.push(SessionFault::OpMismatch);
        }

        if self.postproc != PostProc::None {
            if self.sampling_mode == SamplingMode::Realtime {
                faults.push(SessionFault::PostprocOnRealtime);
            }
            // Sonic derivatives are selected through the sonic operation,
            // so post-processing is analog-only.
            if !matches!(
                self.channel.class(),
                ChannelClass::Analog | ChannelClass::All
            ) {
                faults.push(SessionFault::PostprocOnSonic);
            }
        }

        faults
    }
}
