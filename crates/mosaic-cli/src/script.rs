//! Pan scripts
//!
//! A script is a list of steps, one per `--step` flag:
//!
//! ```text
//! pan:DX,DY        direct pan
//! drag:X0,Y0,X1,Y1 pointer down at (X0, Y0), move to (X1, Y1), release
//! wheel:DY         wheel scroll
//! resize:WxH       canvas resize (CSS pixels)
//! ratio:R          device pixel ratio change
//! ```

use std::str::FromStr;

use mosaic_engine::InputEvent;

/// One scripted input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Pan { dx: f32, dy: f32 },
    Drag { from: (f32, f32), to: (f32, f32) },
    Wheel { delta_y: f32 },
    Resize { width: f32, height: f32 },
    PixelRatio { ratio: f32 },
}

impl Step {
    /// Input events this step expands to (empty for direct calls)
    pub fn events(&self) -> Vec<InputEvent> {
        match *self {
            Step::Pan { .. } | Step::PixelRatio { .. } => Vec::new(),
            Step::Drag { from, to } => vec![
                InputEvent::PointerDown { x: from.0, y: from.1 },
                InputEvent::PointerMove { x: to.0, y: to.1 },
                InputEvent::PointerUp,
            ],
            Step::Wheel { delta_y } => vec![InputEvent::Wheel { delta_x: 0.0, delta_y }],
            Step::Resize { width, height } => vec![InputEvent::Resize { width, height }],
        }
    }
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (op, args) = s
            .split_once(':')
            .ok_or_else(|| format!("missing ':' in step '{s}'"))?;

        match op.trim() {
            "pan" => {
                let [dx, dy] = numbers(args, ',')?;
                Ok(Step::Pan { dx, dy })
            }
            "drag" => {
                let [x0, y0, x1, y1] = numbers(args, ',')?;
                Ok(Step::Drag { from: (x0, y0), to: (x1, y1) })
            }
            "wheel" => {
                let [delta_y] = numbers(args, ',')?;
                Ok(Step::Wheel { delta_y })
            }
            "resize" => {
                let [width, height] = numbers(args, 'x')?;
                Ok(Step::Resize { width, height })
            }
            "ratio" => {
                let [ratio] = numbers(args, ',')?;
                Ok(Step::PixelRatio { ratio })
            }
            other => Err(format!("unknown step '{other}'")),
        }
    }
}

fn numbers<const N: usize>(args: &str, sep: char) -> Result<[f32; N], String> {
    let parsed = args
        .split(sep)
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| format!("'{part}': {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    <[f32; N]>::try_from(parsed).map_err(|v| format!("expected {N} numbers, got {}", v.len()))
}
