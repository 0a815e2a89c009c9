// src/shared/mod.rs

// Declara o submódulo com as structs compartilhadas entre os módulos
pub mod shared_structs;
// Declara o submódulo com o tipo de erro da camada de serviço
pub mod erros;
