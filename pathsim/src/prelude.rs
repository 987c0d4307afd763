pub use crate::{
    models::{
        modifierschedule::*, partition::*, pathsimulator::*, randomnumbers::*,
        simulationconfig::*, simulationresult::*,
    },
    risk::{riskanalyzer::*, summarystatistics::*},
    utils::errors::*,
};
