pub mod modifierschedule;
pub mod partition;
pub mod pathsimulator;
pub mod randomnumbers;
pub mod simulationconfig;
pub mod simulationresult;
